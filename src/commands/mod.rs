pub mod classify;
pub mod init;
pub mod schema;
pub mod stage;
pub mod utterances;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::config::Config;
use crate::discovery::discover_commands;
use crate::intent::{CommandMetadata, ProjectState};
use crate::state::load_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Text,
    Json,
}

impl OutputFormat {
    /// Explicit choice, else pretty on a terminal and text otherwise.
    pub fn resolve(format: Option<Self>) -> Self {
        format.unwrap_or_else(|| {
            if std::io::stdout().is_terminal() {
                Self::Pretty
            } else {
                Self::Text
            }
        })
    }
}

/// The project root: `--project-root`, else the current directory.
pub fn project_root(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => std::env::current_dir().context("could not determine current directory"),
    }
}

/// Overrides for where commands and project state are read from.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Commands directory (default: paths.commands_dir from config)
    #[arg(long, value_name = "DIR")]
    pub commands: Option<PathBuf>,
    /// Project state JSON file (default: paths.state_file from config)
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,
}

impl SourceArgs {
    pub fn load_commands(&self, root: &Path, config: &Config) -> anyhow::Result<Vec<CommandMetadata>> {
        load_commands(self.commands.as_deref(), root, config)
    }

    pub fn load_state(&self, root: &Path, config: &Config) -> anyhow::Result<ProjectState> {
        let path = self
            .state
            .clone()
            .unwrap_or_else(|| config.paths.state_file(root));
        load_state(&path)
    }
}

pub fn load_commands(
    explicit: Option<&Path>,
    root: &Path,
    config: &Config,
) -> anyhow::Result<Vec<CommandMetadata>> {
    let dir = explicit.map_or_else(|| config.paths.commands_dir(root), Path::to_path_buf);
    discover_commands(&dir)
}
