use std::path::Path;

use clap::Args;
use serde::Serialize;

use super::{OutputFormat, SourceArgs};
use crate::config::Config;
use crate::intent::{LifecycleStage, derive_stage, filter_commands};

#[derive(Debug, Args)]
pub struct StageArgs {
    #[command(flatten)]
    pub sources: SourceArgs,
    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Serialize)]
pub struct StageReport {
    pub stage: LifecycleStage,
    pub candidates: Vec<String>,
    /// Discovered commands hidden in this stage.
    pub excluded: Vec<String>,
}

impl StageArgs {
    pub fn execute(&self, root: &Path) -> anyhow::Result<()> {
        let config = Config::load_or_default(root)?;
        let commands = self.sources.load_commands(root, &config)?;
        let state = self.sources.load_state(root, &config)?;

        let stage = derive_stage(&state);
        let candidates: Vec<String> = filter_commands(&commands, stage)
            .into_iter()
            .map(|c| c.name)
            .collect();
        let excluded = commands
            .into_iter()
            .map(|c| c.name)
            .filter(|name| !candidates.contains(name))
            .collect();
        let report = StageReport {
            stage,
            candidates,
            excluded,
        };

        match OutputFormat::resolve(self.format) {
            OutputFormat::Pretty => print_pretty(&report),
            OutputFormat::Text => print_text(&report),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        }
        Ok(())
    }
}

fn print_pretty(report: &StageReport) {
    println!("Stage: {}\n", report.stage);
    println!("Available ({}):", report.candidates.len());
    for name in &report.candidates {
        println!("  ✓ {name}");
    }
    if !report.excluded.is_empty() {
        println!("\nHidden in this stage ({}):", report.excluded.len());
        for name in &report.excluded {
            println!("  - {name}");
        }
    }
}

fn print_text(report: &StageReport) {
    println!("stage  {}", report.stage);
    for name in &report.candidates {
        println!("candidate  {name}");
    }
    for name in &report.excluded {
        println!("excluded  {name}");
    }
}
