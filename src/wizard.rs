//! Interactive prompt loop over the same pages the subcommands drive.
//!
//! Each page is rendered, then its fields are asked for one per line. An
//! empty answer keeps the shown value, `<` goes back and `:q` quits.
use crate::config::WizardConfig;
use crate::controller::{self, StepController, SubmitOptions, SubmitOutcome};
use crate::draft::{DraftSlot, DraftStore};
use crate::files::FilePicker;
use crate::flow::{self, find_page, PageDef, PageKind, Selection};
use crate::i18n::{Catalog, Translator};
use crate::login::{self, LoginOutcome};
use crate::nav::Navigator;
use crate::route::Route;
use crate::summary;
use crate::view;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

const BACK: &str = "<";
const QUIT: &str = ":q";
const CLEAR: &str = "-";

enum Answer {
    Value(String),
    Back,
    Quit,
}

/// What the loop does after a page finished.
enum Step {
    Continue,
    Stop,
}

pub struct Wizard<'a, S: DraftSlot, N: Navigator, P: FilePicker> {
    pub store: &'a mut DraftStore<S>,
    pub nav: &'a mut N,
    pub catalog: &'a Catalog,
    pub config: &'a WizardConfig,
    pub picker: &'a P,
}

impl<S: DraftSlot, N: Navigator, P: FilePicker> Wizard<'_, S, N, P> {
    /// Drive pages until the user quits, input ends, or `/complete` is shown.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<()> {
        loop {
            let route = self.nav.current().clone();
            writeln!(output, "\n{}", self.nav.href(&route)).context("write prompt")?;
            write!(
                output,
                "{}",
                view::render_route(&route, self.store.snapshot(), self.catalog)
            )
            .context("write page")?;

            let step = match &route {
                Route::Home => self.home(input, output)?,
                Route::Login => self.login(input, output)?,
                Route::SelectType => self.select_type(input, output)?,
                Route::Complete => Step::Stop,
                Route::Page { .. } => match find_page(&route) {
                    Some(def) if def.kind == PageKind::Confirm => {
                        self.confirm(def, input, output)?
                    }
                    Some(def) => self.step(def, input, output)?,
                    None => Step::Stop,
                },
            };
            if let Step::Stop = step {
                tracing::debug!(route = %self.nav.current(), "wizard finished");
                return Ok(());
            }
        }
    }

    fn home<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<Step> {
        let label = self.catalog.t("home.start");
        match ask(input, output, &label)? {
            Answer::Quit => Ok(Step::Stop),
            Answer::Back | Answer::Value(_) => {
                self.nav.push(Route::Login)?;
                Ok(Step::Continue)
            }
        }
    }

    fn login<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<Step> {
        let email = match ask(input, output, &self.catalog.t("login.email"))? {
            Answer::Value(value) => value,
            other => return self.navigate(other),
        };
        let password = match ask(input, output, &self.catalog.t("login.password"))? {
            Answer::Value(value) => value,
            other => return self.navigate(other),
        };
        let delay = self.config.login_delay();
        match login::login(&email, &password, self.nav, self.catalog, delay)? {
            LoginOutcome::SignedIn(_) => {}
            LoginOutcome::Rejected(errors) => {
                write!(output, "{}", view::render_errors(&errors)).context("write errors")?;
            }
        }
        Ok(Step::Continue)
    }

    fn select_type<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<Step> {
        let choice = match ask(input, output, "new | renewal")? {
            Answer::Value(value) => value,
            other => return self.navigate(other),
        };
        if let Selection::Rejected(errors) =
            flow::select_flow(&choice, self.store, self.nav, self.catalog)?
        {
            write!(output, "{}", view::render_errors(&errors)).context("write errors")?;
        }
        Ok(Step::Continue)
    }

    fn step<R: BufRead, W: Write>(
        &mut self,
        def: &'static PageDef,
        input: &mut R,
        output: &mut W,
    ) -> Result<Step> {
        let mut controller = StepController::hydrate(def, self.store.snapshot());
        for field in def.schema.fields {
            let label = summary::field_label(&def.schema, field.key, self.catalog);
            let prompt = format!("{label} [{}]", controller.value(field.key));
            match ask(input, output, &prompt)? {
                Answer::Value(value) if value.is_empty() => {}
                Answer::Value(value) => controller.set(field.key, &value)?,
                other => return self.navigate_from(&mut controller, other),
            }
        }

        let namespace = def.namespace();
        for spec in def.files {
            let current = controller
                .file(spec.slot)
                .map(|file| file.name.clone())
                .unwrap_or_default();
            let label = self.catalog.t(&format!("{namespace}.files.{}", spec.slot));
            let answer = ask(input, output, &format!("{label} <{current}>"))?;
            let file = match answer {
                Answer::Value(value) if value.is_empty() => continue,
                Answer::Value(value) if value == CLEAR => None,
                Answer::Value(value) => match self.picker.pick(&value) {
                    Ok(file) => Some(file),
                    Err(err) => {
                        writeln!(output, "  {err:#}").context("write errors")?;
                        continue;
                    }
                },
                other => return self.navigate_from(&mut controller, other),
            };
            if def.kind == PageKind::Checklist {
                controller.attach_now(self.store, spec.slot, file)?;
            } else {
                controller.attach(spec.slot, file)?;
            }
        }

        let outcome = controller.submit(self.store, self.nav, self.catalog)?;
        tracing::debug!(route = %def.route(), state = ?controller.state(), "wizard step submitted");
        if let SubmitOutcome::Rejected { .. } = outcome {
            write!(output, "{}", view::render_outcome(&outcome)).context("write errors")?;
        }
        Ok(Step::Continue)
    }

    fn confirm<R: BufRead, W: Write>(
        &mut self,
        def: &'static PageDef,
        input: &mut R,
        output: &mut W,
    ) -> Result<Step> {
        let label = format!("{} [y/N]", self.catalog.t("common.submit"));
        match ask(input, output, &label)? {
            Answer::Value(value) if value.eq_ignore_ascii_case("y") => {}
            Answer::Value(_) => return Ok(Step::Continue),
            other => return self.navigate(other),
        }
        if def.missing_files(self.store.snapshot()).is_empty() {
            writeln!(output, "{}", self.catalog.t("common.submitting"))
                .context("write status")?;
        }
        let options = SubmitOptions {
            delay: self.config.submit_delay(),
            clear_on_complete: self.config.clear_on_complete,
        };
        let outcome =
            controller::submit_confirmation(def, self.store, self.nav, self.catalog, options)?;
        if let SubmitOutcome::Rejected { .. } = outcome {
            write!(output, "{}", view::render_outcome(&outcome)).context("write errors")?;
            // Documents can only be attached on earlier pages.
            self.nav.back()?;
        }
        Ok(Step::Continue)
    }

    fn navigate(&mut self, answer: Answer) -> Result<Step> {
        match answer {
            Answer::Back => {
                self.nav.back()?;
                Ok(Step::Continue)
            }
            Answer::Quit => Ok(Step::Stop),
            Answer::Value(_) => Ok(Step::Continue),
        }
    }

    fn navigate_from(&mut self, controller: &mut StepController, answer: Answer) -> Result<Step> {
        match answer {
            Answer::Back => {
                controller.back(self.nav)?;
                Ok(Step::Continue)
            }
            other => self.navigate(other),
        }
    }
}

/// Ask one question. End of input counts as quitting.
fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<Answer> {
    write!(output, "{label}: ").context("write prompt")?;
    output.flush().context("flush prompt")?;
    let mut line = String::new();
    let read = input.read_line(&mut line).context("read answer")?;
    if read == 0 {
        return Ok(Answer::Quit);
    }
    let answer = line.trim_end_matches(['\r', '\n']).trim();
    Ok(match answer {
        BACK => Answer::Back,
        QUIT => Answer::Quit,
        other => Answer::Value(other.to_string()),
    })
}
