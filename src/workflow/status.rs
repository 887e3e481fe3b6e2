//! Status summary: where the session is and what to do next.
use super::SessionContext;
use crate::cli::StatusArgs;
use crate::controller::StepController;
use crate::draft::Draft;
use crate::flow::{find_page, PageDef, PageKind};
use crate::nav::Navigator;
use crate::route::Route;
use anyhow::{Context, Result};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct StatusSummary {
    pub state_dir: String,
    pub route: String,
    pub href: String,
    pub history_depth: usize,
    pub locale: String,
    pub flow: Option<String>,
    pub page_kind: Option<String>,
    pub progress: Option<ProgressSummary>,
    /// Draft keys the current page writes.
    pub page_keys: Vec<String>,
    pub draft_fields: usize,
    pub draft: Draft,
    pub missing_documents: Vec<String>,
    pub next_action: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressSummary {
    pub current: u32,
    pub total: u32,
    pub percent: u32,
}

pub(crate) fn run_status(ctx: &SessionContext, args: &StatusArgs) -> Result<()> {
    let summary = build_status_summary(ctx);
    if args.json {
        let text = serde_json::to_string_pretty(&summary).context("serialize status summary")?;
        println!("{text}");
        return Ok(());
    }
    println!("state dir: {}", summary.state_dir);
    println!("page: {} ({})", summary.route, summary.href);
    if let Some(flow) = &summary.flow {
        println!("flow: {flow}");
    }
    if let Some(progress) = &summary.progress {
        println!(
            "progress: {}/{} ({}%)",
            progress.current, progress.total, progress.percent
        );
    }
    println!("draft fields: {}", summary.draft_fields);
    if !summary.missing_documents.is_empty() {
        println!("missing documents: {}", summary.missing_documents.join(", "));
    }
    println!("next: {}", summary.next_action);
    Ok(())
}

pub(crate) fn build_status_summary(ctx: &SessionContext) -> StatusSummary {
    let route = ctx.current();
    let draft = ctx.store.snapshot();
    let def = find_page(route);
    let missing_documents = match def {
        Some(def) if def.kind == PageKind::Confirm => def
            .missing_files(draft)
            .iter()
            .map(|spec| spec.slot.to_string())
            .collect(),
        Some(def) => StepController::hydrate(def, draft)
            .missing_files()
            .iter()
            .map(|spec| spec.slot.to_string())
            .collect(),
        None => Vec::new(),
    };

    StatusSummary {
        state_dir: ctx.paths.root().display().to_string(),
        route: route.path(),
        href: ctx.nav.href(route),
        history_depth: ctx.nav.depth(),
        locale: ctx.catalog.locale().to_string(),
        flow: route.flow().map(|flow| flow.to_string()),
        page_kind: def.map(|def| format!("{:?}", def.kind).to_lowercase()),
        progress: def.map(|def| ProgressSummary {
            current: def.progress.current,
            total: def.progress.total,
            percent: def.progress.percent(),
        }),
        page_keys: def.map(PageDef::draft_keys).unwrap_or_default(),
        draft_fields: draft.len(),
        draft: draft.clone(),
        next_action: next_action(route, def.map(|def| def.kind), &missing_documents),
        missing_documents,
    }
}

fn next_action(route: &Route, kind: Option<PageKind>, missing: &[String]) -> String {
    let action = match (route, kind) {
        (Route::Home, _) => "visa-intake start",
        (Route::Login, _) => "visa-intake login --email <EMAIL> --password <PASSWORD>",
        (Route::SelectType, _) => "visa-intake select <new|renewal>",
        (Route::Complete, _) => "visa-intake home",
        (_, Some(PageKind::Confirm)) if !missing.is_empty() => {
            "visa-intake back (attach the missing documents first)"
        }
        (_, Some(PageKind::Confirm)) => "visa-intake confirm",
        (_, Some(PageKind::Checklist)) => "visa-intake submit --file <SLOT>=<PATH>",
        _ => "visa-intake submit --set <FIELD>=<VALUE>",
    };
    action.to_string()
}
