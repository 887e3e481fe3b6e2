//! Fixed step sequences for the two application types.
//!
//! Each flow is a hardcoded, ordered table of [`PageDef`]s with no branching
//! between pages; conditional requirements only exist inside a single page.
//! Both flows end on the shared `/complete` route.
mod new_application;
mod renewal;

pub use crate::route::FlowKind;

use crate::draft::{Draft, DraftSlot, DraftStore};
use crate::i18n::Translator;
use crate::nav::Navigator;
use crate::route::Route;
use crate::validate::{self, FieldErrors, FieldKind, FieldSpec, FormInput, Rule, StepSchema};
use anyhow::Result;
use std::str::FromStr;

/// Draft key recording which flow the draft belongs to.
pub const APPLICATION_TYPE_KEY: &str = "applicationType";

const SELECT_TYPE_SCHEMA: StepSchema = StepSchema {
    namespace: "selectType",
    fields: &[FieldSpec::required(
        APPLICATION_TYPE_KEY,
        FieldKind::Text,
        &[Rule::OneOf {
            choices: &["new", "renewal"],
            message: "errors.selectType",
        }],
    )],
    cross: &[],
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Schema-validated form that merges on submit.
    Form,
    /// Document list that writes each file name as soon as it changes.
    Checklist,
    /// Read-only summary with a simulated submission.
    Confirm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub current: u32,
    pub total: u32,
}

impl Progress {
    /// Completion percentage shown next to the step label.
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let done = self.current.saturating_sub(1).min(self.total);
        ((f64::from(done) / f64::from(self.total)) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextRoute {
    /// Another page of the same flow.
    Page(&'static str),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRequirement {
    Always,
    Optional,
    /// Required only while `field` equals `equals`.
    When {
        field: &'static str,
        equals: &'static str,
    },
}

impl FileRequirement {
    pub fn is_required(&self, values: &Draft) -> bool {
        match self {
            FileRequirement::Always => true,
            FileRequirement::Optional => false,
            FileRequirement::When { field, equals } => values.text(field) == Some(*equals),
        }
    }

    /// True when the requirement can ever block submission.
    pub fn can_require(&self) -> bool {
        !matches!(self, FileRequirement::Optional)
    }
}

/// An uploadable document whose name is persisted as `<slot>FileName`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileSlotSpec {
    pub slot: &'static str,
    pub requirement: FileRequirement,
}

impl FileSlotSpec {
    pub const fn new(slot: &'static str, requirement: FileRequirement) -> Self {
        Self { slot, requirement }
    }

    pub fn draft_key(&self) -> String {
        format!("{}FileName", self.slot)
    }
}

/// Static definition of one page of a flow.
#[derive(Debug, Clone, Copy)]
pub struct PageDef {
    pub flow: FlowKind,
    pub page: &'static str,
    pub kind: PageKind,
    pub schema: StepSchema,
    pub files: &'static [FileSlotSpec],
    pub progress: Progress,
    pub next: NextRoute,
}

impl PageDef {
    pub fn route(&self) -> Route {
        Route::page(self.flow, self.page)
    }

    pub fn next_route(&self) -> Route {
        match self.next {
            NextRoute::Page(page) => Route::page(self.flow, page),
            NextRoute::Complete => Route::Complete,
        }
    }

    pub fn namespace(&self) -> &'static str {
        self.schema.namespace
    }

    /// Every draft key this page may write.
    pub fn draft_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.schema.keys().map(str::to_string).collect();
        keys.extend(self.files.iter().map(FileSlotSpec::draft_key));
        keys
    }

    /// File slots missing a name while required under `values`.
    pub fn missing_files(&self, values: &Draft) -> Vec<&'static FileSlotSpec> {
        self.files
            .iter()
            .filter(|spec| spec.requirement.is_required(values))
            .filter(|spec| !values.has_text(&spec.draft_key()))
            .collect()
    }
}

pub fn pages(flow: FlowKind) -> &'static [PageDef] {
    match flow {
        FlowKind::New => new_application::PAGES,
        FlowKind::Renewal => renewal::PAGES,
    }
}

/// First page of `flow`.
pub fn entry(flow: FlowKind) -> &'static PageDef {
    &pages(flow)[0]
}

pub fn find_page(route: &Route) -> Option<&'static PageDef> {
    let Route::Page { flow, page } = route else {
        return None;
    };
    pages(*flow).iter().find(|def| def.page == page.as_str())
}

/// Outcome of the select-type page.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Entered(Route),
    Rejected(FieldErrors),
}

/// Choose a flow and navigate to its first step.
///
/// A draft started under the other flow is cleared first, since both flows
/// reuse keys like `address` and `phone` with different meanings.
pub fn select_flow<S: DraftSlot, N: Navigator>(
    choice: &str,
    store: &mut DraftStore<S>,
    nav: &mut N,
    translator: &dyn Translator,
) -> Result<Selection> {
    let mut input = FormInput::new();
    input.insert(APPLICATION_TYPE_KEY.to_string(), choice.to_string());
    let validated = match validate::validate_step(&SELECT_TYPE_SCHEMA, &input, translator) {
        Ok(validated) => validated,
        Err(errors) => return Ok(Selection::Rejected(errors)),
    };
    let flow = FlowKind::from_str(choice)?;

    let previous = store
        .snapshot()
        .text(APPLICATION_TYPE_KEY)
        .map(str::to_string);
    if let Some(previous) = previous.filter(|previous| previous != flow.as_str()) {
        tracing::warn!(previous = %previous, selected = %flow, "switching application type; clearing draft");
        store.clear()?;
    }
    store.merge(&validated)?;

    let route = entry(flow).route();
    nav.push(route.clone())?;
    tracing::info!(flow = %flow, route = %route, "flow selected");
    Ok(Selection::Entered(route))
}

#[cfg(test)]
#[path = "flow_tests.rs"]
mod tests;
