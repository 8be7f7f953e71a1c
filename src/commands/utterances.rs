use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use super::{OutputFormat, load_commands};
use crate::config::Config;
use crate::error::ExitError;
use crate::intent::augment;

#[derive(Debug, Args)]
pub struct UtterancesArgs {
    /// Only show this command (full or local name)
    pub name: Option<String>,
    /// Commands directory (default: paths.commands_dir from config)
    #[arg(long, value_name = "DIR")]
    pub commands: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Serialize)]
pub struct CommandUtterances {
    pub name: String,
    pub utterances: Vec<String>,
}

impl UtterancesArgs {
    pub fn execute(&self, root: &Path) -> anyhow::Result<()> {
        let config = Config::load_or_default(root)?;
        let commands = load_commands(self.commands.as_deref(), root, &config)?;

        let selected: Vec<CommandUtterances> = commands
            .iter()
            .filter(|c| {
                self.name
                    .as_deref()
                    .is_none_or(|n| c.name == n || c.local_name() == n)
            })
            .map(|c| CommandUtterances {
                name: c.name.clone(),
                utterances: augment(c),
            })
            .collect();

        if let (Some(name), true) = (&self.name, selected.is_empty()) {
            return Err(ExitError::NotFound {
                what: format!("command {name}"),
            }
            .into());
        }

        match OutputFormat::resolve(self.format) {
            OutputFormat::Pretty => {
                for entry in &selected {
                    println!("{}", entry.name);
                    for phrase in &entry.utterances {
                        println!("  • {phrase}");
                    }
                }
            }
            OutputFormat::Text => {
                for entry in &selected {
                    for phrase in &entry.utterances {
                        println!("{}  {phrase}", entry.name);
                    }
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&selected)?),
        }
        Ok(())
    }
}
