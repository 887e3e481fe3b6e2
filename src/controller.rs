//! Generic step runner shared by every form page.
//!
//! A [`StepController`] hydrates from the draft slice its page declares,
//! tracks local edits and attached files, and on submit either merges the
//! validated partial and navigates, or reports errors and leaves both the
//! draft and the route untouched.
use crate::draft::{Draft, DraftSlot, DraftStore, DraftValue};
use crate::files::FileRef;
use crate::flow::{FileSlotSpec, PageDef, PageKind};
use crate::i18n::Translator;
use crate::nav::Navigator;
use crate::route::Route;
use crate::validate::{self, FieldErrors, FormInput};
use anyhow::{anyhow, Result};
use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    /// Local values match what was hydrated.
    Pristine,
    Editing,
    Submitting,
    Advanced,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Advanced(Route),
    Rejected {
        errors: FieldErrors,
        /// Standalone message about missing documents.
        file_error: Option<String>,
    },
}

impl SubmitOutcome {
    fn files_only(message: String) -> Self {
        SubmitOutcome::Rejected {
            errors: FieldErrors::new(),
            file_error: Some(message),
        }
    }
}

/// Behavior knobs for the confirmation page.
#[derive(Debug, Clone, Copy)]
pub struct SubmitOptions {
    pub delay: Duration,
    pub clear_on_complete: bool,
}

type FileSlots = BTreeMap<&'static str, Option<FileRef>>;

#[derive(Debug, Clone)]
pub struct StepController {
    def: &'static PageDef,
    /// Draft as seen at hydration; conditional documents read toggles from it.
    context: Draft,
    baseline: FormInput,
    values: FormInput,
    baseline_files: FileSlots,
    files: FileSlots,
    state: StepState,
}

impl StepController {
    /// Mount `def`, reading only the keys it declares from `draft`.
    pub fn hydrate(def: &'static PageDef, draft: &Draft) -> Self {
        let values: FormInput = def
            .schema
            .fields
            .iter()
            .map(|field| {
                let value = match draft.get(field.key).filter(|value| !value.is_null()) {
                    Some(value) => value.to_string(),
                    None => field.empty_value().to_string(),
                };
                (field.key.to_string(), value)
            })
            .collect();
        let files: FileSlots = def
            .files
            .iter()
            .map(|spec| (spec.slot, draft.text(&spec.draft_key()).map(FileRef::named)))
            .collect();
        tracing::debug!(route = %def.route(), fields = values.len(), files = files.len(), "step hydrated");
        Self {
            def,
            context: draft.clone(),
            baseline: values.clone(),
            values,
            baseline_files: files.clone(),
            files,
            state: StepState::Pristine,
        }
    }

    pub fn def(&self) -> &'static PageDef {
        self.def
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    #[cfg(test)]
    pub fn values(&self) -> &FormInput {
        &self.values
    }

    pub fn value(&self, field: &str) -> &str {
        self.values.get(field).map(String::as_str).unwrap_or("")
    }

    pub fn file(&self, slot: &str) -> Option<&FileRef> {
        self.files.get(slot).and_then(Option::as_ref)
    }

    pub fn set(&mut self, field: &str, value: &str) -> Result<()> {
        if self.def.schema.field(field).is_none() {
            return Err(anyhow!(
                "{} has no field {field:?} (expected one of: {})",
                self.def.route(),
                self.def.schema.keys().collect::<Vec<_>>().join(", ")
            ));
        }
        self.values.insert(field.to_string(), value.to_string());
        self.refresh_state();
        Ok(())
    }

    /// Replace the tracked file for `slot`; `None` clears it.
    pub fn attach(&mut self, slot: &str, file: Option<FileRef>) -> Result<()> {
        let spec = self.slot_spec(slot)?;
        self.files.insert(spec.slot, file);
        self.refresh_state();
        Ok(())
    }

    /// Checklist pages persist every attach and clear immediately.
    pub fn attach_now<S: DraftSlot>(
        &mut self,
        store: &mut DraftStore<S>,
        slot: &str,
        file: Option<FileRef>,
    ) -> Result<()> {
        let spec = self.slot_spec(slot)?;
        let value = file
            .as_ref()
            .map_or(DraftValue::Null, |file| DraftValue::from(file.name.as_str()));
        let mut partial = Draft::new();
        partial.insert(spec.draft_key(), value);
        store.merge(&partial)?;
        tracing::info!(slot = spec.slot, attached = file.is_some(), "document updated");
        self.files.insert(spec.slot, file.clone());
        self.baseline_files.insert(spec.slot, file);
        self.context.merge(&partial);
        self.refresh_state();
        Ok(())
    }

    /// Required documents that have no file under the current values.
    pub fn missing_files(&self) -> Vec<&'static FileSlotSpec> {
        let context = self.requirement_context();
        self.def
            .files
            .iter()
            .filter(|spec| spec.requirement.is_required(&context))
            .filter(|spec| {
                !self
                    .file(spec.slot)
                    .is_some_and(|file| !file.name.trim().is_empty())
            })
            .collect()
    }

    /// True when the checklist's "next" action is enabled.
    pub fn can_advance(&self) -> bool {
        self.missing_files().is_empty()
    }

    /// Translated message for missing documents, if any.
    ///
    /// Pages with at most one blocking slot use that slot's own message;
    /// otherwise every missing document label is listed.
    pub fn file_error(&self, translator: &dyn Translator) -> Option<String> {
        let missing = self.missing_files();
        let first = missing.first()?;
        let namespace = self.def.namespace();
        let blocking = self
            .def
            .files
            .iter()
            .filter(|spec| spec.requirement.can_require())
            .count();
        if blocking <= 1 {
            return Some(translator.t(&format!("{namespace}.errors.{}FileRequired", first.slot)));
        }
        let labels: Vec<String> = missing
            .iter()
            .map(|spec| translator.t(&format!("{namespace}.files.{}", spec.slot)))
            .collect();
        let joined = labels.join(&translator.list_separator());
        Some(translator.translate(
            &format!("{namespace}.errors.filesRequired"),
            &[("files", joined.as_str())],
        ))
    }

    /// Validate, merge the step's partial, then navigate to the next route.
    pub fn submit<S: DraftSlot, N: Navigator>(
        &mut self,
        store: &mut DraftStore<S>,
        nav: &mut N,
        translator: &dyn Translator,
    ) -> Result<SubmitOutcome> {
        if self.def.kind == PageKind::Confirm {
            return Err(anyhow!(
                "{} is a confirmation page; use confirm",
                self.def.route()
            ));
        }
        self.state = StepState::Submitting;

        let validated = validate::validate_step(&self.def.schema, &self.values, translator);
        let file_error = self.file_error(translator);
        let mut partial = match (validated, file_error) {
            (Ok(partial), None) => partial,
            (Ok(_), Some(message)) => {
                self.state = StepState::Editing;
                tracing::info!(route = %self.def.route(), "submission blocked by missing documents");
                return Ok(SubmitOutcome::files_only(message));
            }
            (Err(errors), file_error) => {
                self.state = StepState::Editing;
                tracing::info!(route = %self.def.route(), errors = errors.len(), "submission rejected");
                return Ok(SubmitOutcome::Rejected { errors, file_error });
            }
        };

        if self.def.kind == PageKind::Form {
            for spec in self.def.files {
                let value = self
                    .file(spec.slot)
                    .map_or(DraftValue::Null, |file| DraftValue::from(file.name.as_str()));
                partial.insert(spec.draft_key(), value);
            }
            if let Err(err) = store.merge(&partial) {
                self.state = StepState::Editing;
                return Err(err);
            }
        }

        let next = self.def.next_route();
        nav.push(next.clone())?;
        self.baseline = self.values.clone();
        self.baseline_files = self.files.clone();
        self.state = StepState::Advanced;
        tracing::info!(from = %self.def.route(), to = %next, "step submitted");
        Ok(SubmitOutcome::Advanced(next))
    }

    /// Return to the previous route; local edits are discarded.
    pub fn back<N: Navigator>(&mut self, nav: &mut N) -> Result<bool> {
        self.values = self.baseline.clone();
        self.files = self.baseline_files.clone();
        self.refresh_state();
        nav.back()
    }

    fn slot_spec(&self, slot: &str) -> Result<&'static FileSlotSpec> {
        self.def
            .files
            .iter()
            .find(|spec| spec.slot == slot)
            .ok_or_else(|| {
                anyhow!(
                    "{} has no document slot {slot:?} (expected one of: {})",
                    self.def.route(),
                    self.def
                        .files
                        .iter()
                        .map(|spec| spec.slot)
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }

    fn requirement_context(&self) -> Draft {
        let mut context = self.context.clone();
        for (key, value) in &self.values {
            context.insert(key.as_str(), value.as_str());
        }
        context
    }

    fn refresh_state(&mut self) {
        self.state = if self.values == self.baseline && self.files == self.baseline_files {
            StepState::Pristine
        } else {
            StepState::Editing
        };
    }
}

/// Submit the confirmation page of a flow.
///
/// Blocked while a required document name is missing from the draft.
/// Otherwise waits out the simulated submission and moves to `/complete`.
pub fn submit_confirmation<S: DraftSlot, N: Navigator>(
    def: &'static PageDef,
    store: &mut DraftStore<S>,
    nav: &mut N,
    translator: &dyn Translator,
    options: SubmitOptions,
) -> Result<SubmitOutcome> {
    if def.kind != PageKind::Confirm {
        return Err(anyhow!("{} is not a confirmation page", def.route()));
    }
    let missing = def.missing_files(store.snapshot());
    if !missing.is_empty() {
        tracing::info!(
            route = %def.route(),
            missing = missing.len(),
            "confirmation blocked by missing documents"
        );
        return Ok(SubmitOutcome::files_only(
            translator.t(&format!("{}.incompleteFiles", def.namespace())),
        ));
    }

    tracing::info!(flow = %def.flow, delay_ms = options.delay.as_millis() as u64, "submitting application");
    thread::sleep(options.delay);
    nav.push(Route::Complete)?;
    if options.clear_on_complete {
        store.clear()?;
    }
    Ok(SubmitOutcome::Advanced(Route::Complete))
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
