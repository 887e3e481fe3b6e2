//! Init step: write a default config into the state dir.
use crate::cli::InitArgs;
use crate::config::{self, WizardConfig};
use crate::paths::StatePaths;
use anyhow::{anyhow, Result};
use std::path::Path;

pub fn run_init(state_dir: Option<&Path>, args: &InitArgs) -> Result<()> {
    let paths = StatePaths::resolve(state_dir)?;
    let config_path = paths.config_path();
    if config_path.is_file() && !args.force {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }
    config::write_config(&paths, &WizardConfig::default())?;
    println!("wrote {}", config_path.display());
    Ok(())
}
