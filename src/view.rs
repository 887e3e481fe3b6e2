//! Plain-text rendering of pages for the terminal.
use crate::controller::{StepController, SubmitOutcome};
use crate::draft::Draft;
use crate::flow::{find_page, PageDef, PageKind};
use crate::i18n::Translator;
use crate::route::Route;
use crate::summary::{self, build_confirmation, Confirmation};
use crate::validate::FieldErrors;
use std::fmt::Write as _;

/// Render whatever page `route` points at, hydrated from `draft`.
pub fn render_route(route: &Route, draft: &Draft, translator: &dyn Translator) -> String {
    match route {
        Route::Home => render_static(translator, "home", &["title", "description"]),
        Route::Login => render_login(translator),
        Route::SelectType => render_select_type(translator),
        Route::Complete => {
            render_static(translator, "complete", &["title", "message", "nextSteps"])
        }
        Route::Page { .. } => match find_page(route) {
            Some(def) if def.kind == PageKind::Confirm => {
                render_confirmation(def, &build_confirmation(def, draft, translator), translator)
            }
            Some(def) => render_step(&StepController::hydrate(def, draft), translator),
            None => format!("{route}\n"),
        },
    }
}

fn render_static(translator: &dyn Translator, namespace: &str, keys: &[&str]) -> String {
    let mut out = String::new();
    for key in keys {
        let _ = writeln!(out, "{}", translator.t(&format!("{namespace}.{key}")));
    }
    out
}

fn render_login(translator: &dyn Translator) -> String {
    let mut out = render_static(translator, "login", &["title", "description"]);
    for field in ["email", "password"] {
        let _ = writeln!(out, "  {} [{field}]", translator.t(&format!("login.{field}")));
    }
    out
}

fn render_select_type(translator: &dyn Translator) -> String {
    let mut out = render_static(translator, "selectType", &["title", "description"]);
    for choice in ["new", "renewal"] {
        let _ = writeln!(
            out,
            "  [{choice}] {}: {}",
            translator.t(&format!("selectType.{choice}.title")),
            translator.t(&format!("selectType.{choice}.description"))
        );
    }
    out
}

fn progress_line(def: &PageDef, translator: &dyn Translator) -> String {
    let current = def.progress.current.to_string();
    let total = def.progress.total.to_string();
    format!(
        "{} ({}%)",
        translator.translate(
            "common.progress",
            &[("current", current.as_str()), ("total", total.as_str())]
        ),
        def.progress.percent()
    )
}

/// Render a form or checklist page with its current local values.
pub fn render_step(controller: &StepController, translator: &dyn Translator) -> String {
    let def = controller.def();
    let namespace = def.namespace();
    let mut out = String::new();
    let _ = writeln!(out, "{}", progress_line(def, translator));
    let _ = writeln!(out, "{}", translator.t(&format!("{namespace}.title")));
    let _ = writeln!(out, "{}", translator.t(&format!("{namespace}.description")));

    for field in def.schema.fields {
        let label = summary::field_label(&def.schema, field.key, translator);
        let mut line = format!("  {label} [{}]: {}", field.key, controller.value(field.key));
        if let Some(choices) = field.rules.iter().find_map(|rule| rule.choices()) {
            let _ = write!(line, "  ({})", choices.join("|"));
        }
        if field.optional {
            let marker = if is_toggled_on(controller, field.key) {
                "common.required"
            } else {
                "common.optional"
            };
            let _ = write!(line, "  {}", translator.t(marker));
        }
        let _ = writeln!(out, "{line}");
    }

    let missing = controller.missing_files();
    for spec in def.files {
        let required = missing.iter().any(|slot| slot.slot == spec.slot);
        let file = controller.file(spec.slot);
        if def.kind == PageKind::Checklist && file.is_none() && !required {
            continue;
        }
        let status = match file {
            Some(file) => file.name.clone(),
            None => translator.t("common.notUploaded"),
        };
        let marker = if required {
            format!("  {}", translator.t("common.required"))
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "  {} <{}>: {status}{marker}",
            translator.t(&format!("{namespace}.files.{}", spec.slot)),
            spec.slot
        );
    }
    if def.kind == PageKind::Checklist && controller.can_advance() {
        let _ = writeln!(out, "  -> {}", translator.t("common.next"));
    }
    out
}

/// True when a yes/no toggle currently makes the optional `field` required.
fn is_toggled_on(controller: &StepController, field: &str) -> bool {
    controller
        .def()
        .schema
        .cross
        .iter()
        .filter_map(|rule| rule.dependent_field())
        .any(|(toggle, equals, dependent)| {
            dependent == field && controller.value(toggle) == equals
        })
}

pub fn render_confirmation(
    def: &PageDef,
    view: &Confirmation,
    translator: &dyn Translator,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", progress_line(def, translator));
    let _ = writeln!(out, "{}", view.title);
    for section in &view.sections {
        let _ = writeln!(out, "\n## {}", section.title);
        for line in &section.lines {
            let _ = writeln!(out, "  {}: {}", line.label, line.value);
        }
    }
    let _ = writeln!(
        out,
        "\n## {}",
        translator.t(&format!("{}.sections.documents", def.namespace()))
    );
    for doc in &view.documents {
        let status = match &doc.file_name {
            Some(name) => format!("{} ({name})", translator.t("common.uploaded")),
            None => translator.t("common.notUploaded"),
        };
        let marker = if doc.required {
            String::new()
        } else {
            format!("  {}", translator.t("common.optional"))
        };
        let _ = writeln!(out, "  {}: {status}{marker}", doc.label);
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "\n{notice}");
    }
    out
}

pub fn render_errors(errors: &FieldErrors) -> String {
    let mut out = String::new();
    for (field, message) in errors.iter() {
        let _ = writeln!(out, "  {field}: {message}");
    }
    out
}

/// Summarize a submission for the terminal.
pub fn render_outcome(outcome: &SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Advanced(route) => format!("-> {route}\n"),
        SubmitOutcome::Rejected { errors, file_error } => {
            let mut out = render_errors(errors);
            if let Some(message) = file_error {
                let _ = writeln!(out, "  {message}");
            }
            out
        }
    }
}
