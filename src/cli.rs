//! CLI argument parsing for the intake wizard.
//!
//! Every page action maps to one subcommand operating on the persisted
//! session, so a whole application can be driven one invocation at a time.
use crate::i18n::Locale;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "visa-intake",
    version,
    about = "Multi-step visa application intake wizard",
    after_help = "Commands:\n  start                         Leave the home page for the login form\n  login --email <E> --password <P>  Sign in (format check only)\n  select <new|renewal>          Choose an application type\n  show                          Render the current page\n  submit --set k=v --file slot=path  Submit the current step\n  back                          Return to the previous page\n  confirm                       Submit the application from a confirmation page\n  status [--json]               Summarize the session\n  reset                         Clear the draft and navigation history\n  wizard                        Interactive prompt loop\n\nExamples:\n  visa-intake --locale en start\n  visa-intake login --email ana@example.com --password secret\n  visa-intake select renewal\n  visa-intake submit --set name='Tran Thi B' --set email=b@example.com\n  visa-intake submit --file residenceCard=./card.png\n  visa-intake status --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Directory holding slots/ and config.json
    #[arg(long, value_name = "DIR", global = true)]
    pub state_dir: Option<PathBuf>,

    /// Display locale for this invocation (ja, en, zh, vi)
    #[arg(long, value_name = "LOCALE", global = true, value_parser = parse_locale)]
    pub locale: Option<Locale>,

    /// Emit debug logs to stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Init(InitArgs),
    /// Leave the home page for the login form
    Start,
    Login(LoginArgs),
    Select(SelectArgs),
    /// Render the current page
    Show,
    Submit(SubmitArgs),
    /// Return to the previous page
    Back,
    /// Submit the application from a confirmation page
    Confirm,
    /// Switch the session locale, keeping the current page
    Lang(LangArgs),
    /// Return to the home page after completion
    Home,
    Status(StatusArgs),
    /// Clear the draft and navigation history
    Reset,
    Wizard(WizardArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Write a default config.json into the state dir")]
pub struct InitArgs {
    /// Overwrite an existing config.json
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Sign in; only the credential format is checked")]
pub struct LoginArgs {
    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub password: String,
}

#[derive(Parser, Debug)]
#[command(about = "Choose the application type and enter its first step")]
pub struct SelectArgs {
    /// `new` or `renewal`
    pub choice: String,
}

#[derive(Parser, Debug)]
#[command(about = "Submit the current step")]
pub struct SubmitArgs {
    /// Field value as key=value (repeatable)
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set: Vec<String>,

    /// Attach a document as slot=path (repeatable)
    #[arg(long = "file", value_name = "SLOT=PATH")]
    pub file: Vec<String>,

    /// Remove the document in a slot (repeatable)
    #[arg(long = "clear-file", value_name = "SLOT")]
    pub clear_file: Vec<String>,
}

#[derive(Parser, Debug)]
#[command(about = "Switch locale")]
pub struct LangArgs {
    #[arg(value_parser = parse_locale)]
    pub locale: Locale,
}

#[derive(Parser, Debug)]
#[command(about = "Summarize the session and next action")]
pub struct StatusArgs {
    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Walk through the application interactively")]
pub struct WizardArgs {
    /// Keep everything in memory; nothing is written to the state dir
    #[arg(long)]
    pub ephemeral: bool,
}

fn parse_locale(raw: &str) -> Result<Locale, String> {
    raw.parse::<Locale>().map_err(|err| err.to_string())
}
