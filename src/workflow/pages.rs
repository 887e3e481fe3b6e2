//! Page actions: one command per button of the wizard.
use super::SessionContext;
use crate::cli::{LangArgs, LoginArgs, SelectArgs, SubmitArgs};
use crate::controller::{self, StepController, SubmitOptions, SubmitOutcome};
use crate::files::{load_preview, FilePicker, FileRef, FsFilePicker, Preview};
use crate::flow::{self, PageKind, Selection};
use crate::i18n::Translator;
use crate::login::{self, LoginOutcome};
use crate::nav::Navigator;
use crate::route::Route;
use crate::view;
use anyhow::{anyhow, Result};
use std::sync::mpsc::Receiver;
use std::time::Duration;

const PREVIEW_WAIT: Duration = Duration::from_secs(2);

pub(crate) fn run_start(ctx: &mut SessionContext) -> Result<()> {
    ctx.require_route(&Route::Home, "start")?;
    ctx.nav.push(Route::Login)?;
    print_current(ctx);
    Ok(())
}

pub(crate) fn run_login(ctx: &mut SessionContext, args: &LoginArgs) -> Result<()> {
    ctx.require_route(&Route::Login, "login")?;
    let outcome = login::login(
        &args.email,
        &args.password,
        &mut ctx.nav,
        &ctx.catalog,
        ctx.config.login_delay(),
    )?;
    match outcome {
        LoginOutcome::SignedIn(_) => {
            print_current(ctx);
            Ok(())
        }
        LoginOutcome::Rejected(errors) => {
            print!("{}", view::render_errors(&errors));
            Err(anyhow!("login rejected"))
        }
    }
}

pub(crate) fn run_select(ctx: &mut SessionContext, args: &SelectArgs) -> Result<()> {
    ctx.require_route(&Route::SelectType, "select")?;
    match flow::select_flow(&args.choice, &mut ctx.store, &mut ctx.nav, &ctx.catalog)? {
        Selection::Entered(_) => {
            print_current(ctx);
            Ok(())
        }
        Selection::Rejected(errors) => {
            print!("{}", view::render_errors(&errors));
            Err(anyhow!("selection rejected"))
        }
    }
}

pub(crate) fn run_show(ctx: &SessionContext) -> Result<()> {
    print_current(ctx);
    Ok(())
}

pub(crate) fn run_submit(ctx: &mut SessionContext, args: &SubmitArgs) -> Result<()> {
    let def = ctx.require_page("submit")?;
    if def.kind == PageKind::Confirm {
        return Err(anyhow!(
            "{} is a confirmation page; use `visa-intake confirm`",
            def.route()
        ));
    }
    let mut controller = StepController::hydrate(def, ctx.store.snapshot());
    for pair in &args.set {
        let (key, value) = split_pair(pair, "--set")?;
        controller.set(key, value)?;
    }

    let mut previews = Vec::new();
    let picker = FsFilePicker;
    let mut changes: Vec<(String, Option<FileRef>)> = Vec::new();
    for pair in &args.file {
        let (slot, path) = split_pair(pair, "--file")?;
        let picked = picker.pick(path)?;
        if let Some(handle) = picked.handle.as_ref() {
            previews.push((picked.name.clone(), load_preview(handle)));
        }
        changes.push((slot.to_string(), Some(picked)));
    }
    changes.extend(args.clear_file.iter().map(|slot| (slot.clone(), None)));

    for (slot, file) in changes {
        if def.kind == PageKind::Checklist {
            controller.attach_now(&mut ctx.store, &slot, file)?;
        } else {
            controller.attach(&slot, file)?;
        }
    }

    let outcome = controller.submit(&mut ctx.store, &mut ctx.nav, &ctx.catalog)?;
    print_previews(previews);
    match outcome {
        SubmitOutcome::Advanced(_) => {
            print_current(ctx);
            Ok(())
        }
        rejected @ SubmitOutcome::Rejected { .. } => {
            print!("{}", view::render_outcome(&rejected));
            Err(anyhow!("submission rejected on {}", def.route()))
        }
    }
}

pub(crate) fn run_back(ctx: &mut SessionContext) -> Result<()> {
    if !ctx.nav.back()? {
        println!("already at the first page");
    }
    print_current(ctx);
    Ok(())
}

pub(crate) fn run_confirm(ctx: &mut SessionContext) -> Result<()> {
    let def = ctx.require_page("confirm")?;
    let options = SubmitOptions {
        delay: ctx.config.submit_delay(),
        clear_on_complete: ctx.config.clear_on_complete,
    };
    if def.missing_files(ctx.store.snapshot()).is_empty() {
        println!("{}", ctx.catalog.t("common.submitting"));
    }
    let outcome = controller::submit_confirmation(
        def,
        &mut ctx.store,
        &mut ctx.nav,
        &ctx.catalog,
        options,
    )?;
    match outcome {
        SubmitOutcome::Advanced(_) => {
            print_current(ctx);
            Ok(())
        }
        rejected @ SubmitOutcome::Rejected { .. } => {
            print!("{}", view::render_outcome(&rejected));
            Err(anyhow!("application is missing required documents"))
        }
    }
}

pub(crate) fn run_lang(ctx: &mut SessionContext, args: &LangArgs) -> Result<()> {
    let route = ctx.current().clone();
    ctx.nav.replace(route.clone(), args.locale)?;
    println!("{}", ctx.nav.href(&route));
    Ok(())
}

pub(crate) fn run_home(ctx: &mut SessionContext) -> Result<()> {
    ctx.require_route(&Route::Complete, "home")?;
    ctx.nav.reset_to(Route::Home)?;
    print_current(ctx);
    Ok(())
}

pub(crate) fn run_reset(ctx: &mut SessionContext) -> Result<()> {
    ctx.store.clear()?;
    ctx.nav.reset_to(Route::Home)?;
    println!(
        "cleared {} and {}",
        ctx.paths.draft_path().display(),
        ctx.paths.history_path().display()
    );
    Ok(())
}

fn print_current(ctx: &SessionContext) {
    println!("{}", ctx.nav.href(ctx.current()));
    print!(
        "{}",
        view::render_route(ctx.current(), ctx.store.snapshot(), &ctx.catalog)
    );
}

fn print_previews(previews: Vec<(String, Receiver<Result<Preview>>)>) {
    for (name, rx) in previews {
        match rx.recv_timeout(PREVIEW_WAIT) {
            Ok(Ok(preview)) => println!("{name}: {preview}"),
            Ok(Err(err)) => tracing::warn!(file = %name, error = %err, "preview failed"),
            Err(_) => tracing::debug!(file = %name, "preview still loading"),
        }
    }
}

fn split_pair<'a>(pair: &'a str, flag: &str) -> Result<(&'a str, &'a str)> {
    pair.split_once('=')
        .map(|(key, value)| (key.trim(), value))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| anyhow!("{flag} expects KEY=VALUE (got {pair:?})"))
}
