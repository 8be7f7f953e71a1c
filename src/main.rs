use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use steer::commands::{self, classify::ClassifyArgs, init::InitArgs, schema::SchemaArgs};
use steer::commands::{stage::StageArgs, utterances::UtterancesArgs};
use steer::error::ExitError;
use steer::telemetry;

#[derive(Debug, Parser)]
#[command(
    name = "steer",
    version,
    about = "Route natural-language requests to project slash commands"
)]
struct Cli {
    /// Project root directory (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    project_root: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Classify free text into a command
    Classify(ClassifyArgs),
    /// Show the lifecycle stage and the commands it allows
    Stage(StageArgs),
    /// Show the training phrases generated for each command
    Utterances(UtterancesArgs),
    /// Write a default .steer.toml
    Init(InitArgs),
    /// Print the JSON Schema for .steer.toml
    Schema(SchemaArgs),
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Classify(_) => "classify",
            Self::Stage(_) => "stage",
            Self::Utterances(_) => "utterances",
            Self::Init(_) => "init",
            Self::Schema(_) => "schema",
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let root = commands::project_root(cli.project_root.as_deref())?;
    match &cli.command {
        Commands::Classify(args) => args.execute(&root),
        Commands::Stage(args) => args.execute(&root),
        Commands::Utterances(args) => args.execute(&root),
        Commands::Init(args) => args.execute(&root),
        Commands::Schema(args) => args.execute(),
    }
}

fn main() -> ExitCode {
    telemetry::init();

    let cli = Cli::parse();

    let _span = tracing::info_span!("command", name = cli.command.name()).entered();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(exit_err) = e.downcast_ref::<ExitError>() {
                eprintln!("error: {exit_err}");
                exit_err.exit_code()
            } else {
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        }
    }
}
