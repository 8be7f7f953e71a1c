use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;

use crate::config::{self, Config};
use crate::error::ExitError;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing .steer.toml
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    pub fn execute(&self, root: &Path) -> Result<()> {
        let config_path = root.join(config::CONFIG_TOML);
        if config_path.exists() && !self.force {
            return Err(ExitError::Other(format!(
                "{} already exists, use --force to overwrite",
                config_path.display()
            ))
            .into());
        }

        let toml_str = Config::default().to_toml()?;
        fs::write(&config_path, toml_str)
            .with_context(|| format!("writing {}", config_path.display()))?;
        println!("Generated {}", config::CONFIG_TOML);

        let commands_dir = Config::default().paths.commands_dir(root);
        if !commands_dir.is_dir() {
            tracing::warn!(
                dir = %commands_dir.display(),
                "commands directory not found; set paths.commands_dir or pass --commands"
            );
        }
        Ok(())
    }
}
