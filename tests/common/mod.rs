//! Shared test infrastructure for integration tests.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// A state dir with instant delays and English output.
pub struct Session {
    dir: TempDir,
}

/// Captured result of one CLI invocation.
#[derive(Debug)]
pub struct Run {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl From<Output> for Run {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Session {
    pub fn new() -> anyhow::Result<Self> {
        let dir = TempDir::new()?;
        let config = serde_json::json!({
            "schema_version": 1,
            "locale": "en",
            "submit_delay_ms": 0,
            "login_delay_ms": 0,
            "clear_on_complete": true
        });
        std::fs::write(
            dir.path().join("config.json"),
            serde_json::to_string_pretty(&config)?,
        )?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a document to attach and return its path.
    pub fn document(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, b"scan").expect("write document");
        path
    }

    /// Run `visa-intake --state-dir <dir> <args>`.
    pub fn run(&self, args: &[&str]) -> Run {
        Command::new(env!("CARGO_BIN_EXE_visa-intake"))
            .arg("--state-dir")
            .arg(self.dir.path())
            .args(args)
            .env_remove("VISA_INTAKE_LOG")
            .output()
            .expect("spawn visa-intake")
            .into()
    }

    /// Run and panic with stderr unless the command succeeded.
    pub fn ok(&self, args: &[&str]) -> String {
        let run = self.run(args);
        assert!(
            run.success,
            "visa-intake {args:?} failed:\nstdout: {}\nstderr: {}",
            run.stdout, run.stderr
        );
        run.stdout
    }

    /// Parsed `status --json` output.
    pub fn status(&self) -> serde_json::Value {
        let stdout = self.ok(&["status", "--json"]);
        serde_json::from_str(&stdout).expect("status emits JSON")
    }

    /// Sign in and pick `flow`, leaving the session on its first step.
    pub fn enter_flow(&self, flow: &str) {
        self.ok(&["start"]);
        self.ok(&["login", "--email", "ana@example.com", "--password", "secret"]);
        self.ok(&["select", flow]);
    }
}
