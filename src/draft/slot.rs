//! Durable key/value slots backing the draft and navigation history.
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// A durable string slot addressed by key.
pub trait DraftSlot {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&mut self, key: &str, text: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// One JSON file per key under a directory.
///
/// Writes land in a temp file in the same directory and are persisted over
/// the target, so a crash mid-write never leaves a truncated slot behind.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DraftSlot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("read {}", path.display())),
        }
    }

    fn write(&mut self, key: &str, text: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create {}", self.dir.display()))?;
        let path = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.dir)
            .with_context(|| format!("create temp file in {}", self.dir.display()))?;
        tmp.write_all(text.as_bytes())
            .with_context(|| format!("write {}", tmp.path().display()))?;
        tmp.persist(&path)
            .with_context(|| format!("persist {}", path.display()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove {}", path.display())),
        }
    }
}

/// In-process slot used by tests and the one-shot interactive wizard.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    entries: BTreeMap<String, String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_entry(key: &str, text: &str) -> Self {
        let mut slot = Self::new();
        slot.entries.insert(key.to_string(), text.to_string());
        slot
    }
}

impl DraftSlot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, text: &str) -> Result<()> {
        self.entries.insert(key.to_string(), text.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}
