//! Typed paths into the wizard's state directory.
use crate::draft::{FileSlot, DRAFT_SLOT_KEY};
use crate::nav::NAV_SLOT_KEY;
use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding the default state directory.
pub const STATE_DIR_ENV: &str = "VISA_INTAKE_HOME";

#[derive(Debug, Clone)]
pub struct StatePaths {
    root: PathBuf,
}

impl StatePaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve the state dir: explicit flag, then `VISA_INTAKE_HOME`, then
    /// the platform data dir.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(dir) = explicit {
            return Ok(Self::new(dir.to_path_buf()));
        }
        if let Some(dir) = std::env::var_os(STATE_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(Self::new(PathBuf::from(dir)));
        }
        let base = dirs::data_local_dir().ok_or_else(|| {
            anyhow!("no local data directory; pass --state-dir or set {STATE_DIR_ENV}")
        })?;
        Ok(Self::new(base.join("visa-intake")))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Return the `slots/` directory holding one JSON file per slot key.
    pub fn slots_dir(&self) -> PathBuf {
        self.root.join("slots")
    }

    /// Return the `config.json` path.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.json")
    }

    /// Return the `slots/visa-form-data.json` path.
    pub fn draft_path(&self) -> PathBuf {
        self.slot().path_for(DRAFT_SLOT_KEY)
    }

    /// Return the `slots/visa-nav-history.json` path.
    pub fn history_path(&self) -> PathBuf {
        self.slot().path_for(NAV_SLOT_KEY)
    }

    pub fn slot(&self) -> FileSlot {
        FileSlot::new(self.slots_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let paths = StatePaths::resolve(Some(Path::new("/tmp/visa-state"))).unwrap();
        assert_eq!(paths.root(), Path::new("/tmp/visa-state"));
        assert_eq!(
            paths.draft_path(),
            PathBuf::from("/tmp/visa-state/slots/visa-form-data.json")
        );
        assert_eq!(
            paths.history_path(),
            PathBuf::from("/tmp/visa-state/slots/visa-nav-history.json")
        );
        assert_eq!(
            paths.config_path(),
            PathBuf::from("/tmp/visa-state/config.json")
        );
    }
}
