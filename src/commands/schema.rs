use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use schemars::schema_for;

use crate::config::Config;

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Write the schema to a file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

impl SchemaArgs {
    /// Emit the JSON Schema for `.steer.toml`.
    pub fn execute(&self) -> anyhow::Result<()> {
        let schema = schema_for!(Config);
        let json = serde_json::to_string_pretty(&schema)?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, format!("{json}\n"))
                    .with_context(|| format!("writing {}", path.display()))?;
                tracing::info!(path = %path.display(), "wrote config schema");
            }
            None => println!("{json}"),
        }
        Ok(())
    }
}
