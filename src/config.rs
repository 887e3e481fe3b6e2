//! Wizard configuration.
//!
//! `config.json` in the state dir is optional; a missing file means defaults.
//! A present file must carry the current schema version.
use crate::i18n::Locale;
use crate::paths::StatePaths;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::time::Duration;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Upper bound for either simulated delay.
const MAX_DELAY_MS: u64 = 60_000;

fn default_submit_delay_ms() -> u64 {
    1500
}

fn default_login_delay_ms() -> u64 {
    1000
}

fn default_clear_on_complete() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WizardConfig {
    pub schema_version: u32,
    /// Locale used until the user switches language.
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_submit_delay_ms")]
    pub submit_delay_ms: u64,
    #[serde(default = "default_login_delay_ms")]
    pub login_delay_ms: u64,
    /// Drop the draft once an application reaches `/complete`.
    #[serde(default = "default_clear_on_complete")]
    pub clear_on_complete: bool,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION,
            locale: Locale::default(),
            submit_delay_ms: default_submit_delay_ms(),
            login_delay_ms: default_login_delay_ms(),
            clear_on_complete: default_clear_on_complete(),
        }
    }
}

impl WizardConfig {
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    pub fn login_delay(&self) -> Duration {
        Duration::from_millis(self.login_delay_ms)
    }
}

/// Load `config.json`, falling back to defaults when it does not exist.
pub fn load_config(paths: &StatePaths) -> Result<WizardConfig> {
    let path = paths.config_path();
    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(WizardConfig::default());
        }
        Err(err) => return Err(err).with_context(|| format!("read config {}", path.display())),
    };
    let config: WizardConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse wizard config {}", path.display()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Persist a config to disk in a stable JSON format.
pub fn write_config(paths: &StatePaths, config: &WizardConfig) -> Result<()> {
    let path = paths.config_path();
    fs::create_dir_all(paths.root())
        .with_context(|| format!("create {}", paths.root().display()))?;
    let text = serde_json::to_string_pretty(config).context("serialize wizard config")?;
    fs::write(&path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn validate_config(config: &WizardConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported wizard config schema_version {}",
            config.schema_version
        ));
    }
    for (label, value) in [
        ("submit_delay_ms", config.submit_delay_ms),
        ("login_delay_ms", config.login_delay_ms),
    ] {
        if value > MAX_DELAY_MS {
            return Err(anyhow!(
                "{label} must be at most {MAX_DELAY_MS} (got {value})"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&StatePaths::new(dir.path().to_path_buf())).unwrap();
        assert_eq!(config, WizardConfig::default());
        assert_eq!(config.submit_delay(), Duration::from_millis(1500));
        assert_eq!(config.login_delay(), Duration::from_millis(1000));
        assert!(config.clear_on_complete);
        assert_eq!(config.locale, Locale::Ja);
    }

    #[test]
    fn written_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StatePaths::new(dir.path().join("state"));
        let config = WizardConfig {
            locale: Locale::Vi,
            submit_delay_ms: 0,
            ..WizardConfig::default()
        };
        write_config(&paths, &config).unwrap();
        assert_eq!(load_config(&paths).unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let paths = StatePaths::new(dir.path().to_path_buf());
        fs::write(
            paths.config_path(),
            r#"{"schema_version":1,"locale":"en","clear_on_complete":false}"#,
        )
        .unwrap();
        let config = load_config(&paths).unwrap();
        assert_eq!(config.locale, Locale::En);
        assert!(!config.clear_on_complete);
        assert_eq!(config.submit_delay_ms, 1500);
    }

    #[test]
    fn rejects_unknown_schema_and_fields() {
        let config = WizardConfig {
            schema_version: 2,
            ..WizardConfig::default()
        };
        assert!(validate_config(&config).is_err());

        let dir = tempfile::tempdir().unwrap();
        let paths = StatePaths::new(dir.path().to_path_buf());
        fs::write(paths.config_path(), r#"{"schema_version":1,"theme":"dark"}"#).unwrap();
        assert!(load_config(&paths).is_err());
    }

    #[test]
    fn rejects_excessive_delays() {
        let config = WizardConfig {
            submit_delay_ms: 600_000,
            ..WizardConfig::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("submit_delay_ms"));
    }
}
