//! Multi-step visa application intake wizard.
//!
//! Each subcommand performs one page action against a session persisted in
//! the state dir; `wizard` runs the same pages as an interactive loop.
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod controller;
mod draft;
mod files;
mod flow;
mod i18n;
mod login;
mod nav;
mod paths;
mod route;
mod summary;
mod validate;
mod view;
mod wizard;
mod workflow;

use cli::{Command, RootArgs};
use workflow::SessionContext;

/// Env var holding a `tracing` filter directive.
const LOG_ENV: &str = "VISA_INTAKE_LOG";

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_tracing(args.verbose);

    let session = || SessionContext::load(args.state_dir.as_deref(), args.locale);
    match &args.command {
        Command::Init(init) => workflow::run_init(args.state_dir.as_deref(), init),
        Command::Wizard(wizard_args) => run_wizard(&args, wizard_args),
        Command::Start => workflow::run_start(&mut session()?),
        Command::Login(login) => workflow::run_login(&mut session()?, login),
        Command::Select(select) => workflow::run_select(&mut session()?, select),
        Command::Show => workflow::run_show(&session()?),
        Command::Submit(submit) => workflow::run_submit(&mut session()?, submit),
        Command::Back => workflow::run_back(&mut session()?),
        Command::Confirm => workflow::run_confirm(&mut session()?),
        Command::Lang(lang) => workflow::run_lang(&mut session()?, lang),
        Command::Home => workflow::run_home(&mut session()?),
        Command::Status(status) => workflow::run_status(&session()?, status),
        Command::Reset => workflow::run_reset(&mut session()?),
    }
}

fn init_tracing(verbose: bool) {
    let directive = if verbose {
        "debug".to_string()
    } else {
        std::env::var(LOG_ENV).unwrap_or_else(|_| "warn".to_string())
    };
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run_wizard(args: &RootArgs, wizard_args: &cli::WizardArgs) -> Result<()> {
    use draft::{DraftStore, MemorySlot};
    use i18n::Catalog;
    use nav::{HistoryNavigator, Navigator};

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    let picker = files::FsFilePicker;

    if wizard_args.ephemeral {
        let config = config::WizardConfig::default();
        let mut store = DraftStore::open(MemorySlot::new());
        let mut nav = HistoryNavigator::open(MemorySlot::new(), config.locale);
        let catalog = Catalog::load(args.locale.unwrap_or_else(|| nav.locale()))?;
        return wizard::Wizard {
            store: &mut store,
            nav: &mut nav,
            catalog: &catalog,
            config: &config,
            picker: &picker,
        }
        .run(&mut input, &mut output);
    }

    let ctx = SessionContext::load(args.state_dir.as_deref(), args.locale)?;
    let SessionContext {
        config,
        mut store,
        mut nav,
        catalog,
        ..
    } = ctx;
    wizard::Wizard {
        store: &mut store,
        nav: &mut nav,
        catalog: &catalog,
        config: &config,
        picker: &picker,
    }
    .run(&mut input, &mut output)
}
