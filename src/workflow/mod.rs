//! Command handlers for the intake wizard.
//!
//! Each handler loads the session, performs one page action and prints the
//! resulting page, so the CLI stays a thin router.
mod context;
mod init;
mod pages;
mod status;

pub(crate) use context::SessionContext;
pub(crate) use init::run_init;
pub(crate) use pages::{
    run_back, run_confirm, run_home, run_lang, run_login, run_reset, run_select, run_show,
    run_start, run_submit,
};
pub(crate) use status::run_status;
