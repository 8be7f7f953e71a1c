use std::io::IsTerminal;
use std::path::Path;

use clap::Args;

use super::{OutputFormat, SourceArgs};
use crate::config::Config;
use crate::error::ExitError;
use crate::intent::{
    ClassificationResult, CommandMetadata, ExtractedArguments, InitOptions, IntentClassifier,
    MatchKind, OllamaEmbedder,
};

#[derive(Debug, Args)]
pub struct ClassifyArgs {
    /// Text to classify; words are joined with spaces. Options go before
    /// the text, everything after its first word is taken verbatim.
    #[arg(
        required = true,
        value_name = "INPUT",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub input: Vec<String>,
    #[command(flatten)]
    pub sources: SourceArgs,
    /// Enable the embedding fallback for this run
    #[arg(long, conflicts_with = "no_semantic")]
    pub semantic: bool,
    /// Disable the embedding fallback for this run
    #[arg(long)]
    pub no_semantic: bool,
    /// Prompt for a choice when the result is ambiguous
    #[arg(long)]
    pub pick: bool,
    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

impl ClassifyArgs {
    pub fn execute(&self, root: &Path) -> anyhow::Result<()> {
        let config = Config::load_or_default(root)?;
        let commands = self.sources.load_commands(root, &config)?;
        let state = self.sources.load_state(root, &config)?;

        let mut classifier = IntentClassifier::new(config.classifier.clone())
            .map_err(ExitError::from)?
            .with_embedder(Box::new(OllamaEmbedder::new(config.embedding.clone())));
        classifier.initialize(
            commands,
            InitOptions {
                enable_semantic: self.semantic_override(),
            },
        );

        let input = self.input.join(" ");
        let result = classifier.classify(&input, &state);

        let interactive = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
        if self.pick && interactive && result.kind == MatchKind::Ambiguous {
            if let Some(command) = pick_alternative(&result)? {
                println!("{}", command.invocation(&suggested_args(&result.arguments)));
                return Ok(());
            }
            tracing::debug!("pick cancelled, showing ambiguous result");
        }

        match OutputFormat::resolve(self.format) {
            OutputFormat::Pretty => print_pretty(&result),
            OutputFormat::Text => print_text(&result),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        }
        Ok(())
    }

    const fn semantic_override(&self) -> Option<bool> {
        if self.semantic {
            Some(true)
        } else if self.no_semantic {
            Some(false)
        } else {
            None
        }
    }
}

fn pick_alternative(result: &ClassificationResult) -> anyhow::Result<Option<&CommandMetadata>> {
    let items: Vec<String> = result
        .alternatives
        .iter()
        .map(|a| format!("{}  ({:.0}%)  {}", a.command.name, a.confidence * 100.0, a.command.description))
        .collect();
    let choice = dialoguer::Select::new()
        .with_prompt("Which command did you mean?")
        .items(&items)
        .default(0)
        .interact_opt()?;
    Ok(chosen(result, choice))
}

/// The alternative behind a `Select` answer; `None` when the prompt was cancelled.
fn chosen(result: &ClassificationResult, choice: Option<usize>) -> Option<&CommandMetadata> {
    choice
        .and_then(|i| result.alternatives.get(i))
        .map(|a| &a.command)
}

/// Invocation for `result`: the user's own arguments for an exact match,
/// otherwise the structured values recovered from free text.
pub fn invocation(result: &ClassificationResult) -> Option<String> {
    let command = result.command.as_ref()?;
    let args = if result.kind == MatchKind::ExactMatch {
        result.arguments.raw.clone()
    } else {
        suggested_args(&result.arguments)
    };
    Some(command.invocation(&args))
}

fn suggested_args(args: &ExtractedArguments) -> String {
    let mut parts: Vec<&str> = Vec::new();
    parts.extend(args.phase_number.as_deref());
    parts.extend(args.version.as_deref());
    parts.extend(args.flags.iter().map(String::as_str));
    if let Some(profile) = args.profile.as_deref() {
        if !args.flags.iter().any(|f| f == "--profile") {
            parts.push("--profile");
        }
        parts.push(profile);
    }
    parts.join(" ")
}

fn argument_summary(args: &ExtractedArguments) -> Vec<(&'static str, String)> {
    let mut fields = Vec::new();
    if let Some(phase) = &args.phase_number {
        fields.push(("phase", phase.clone()));
    }
    if let Some(version) = &args.version {
        fields.push(("version", version.clone()));
    }
    if let Some(profile) = &args.profile {
        fields.push(("profile", profile.clone()));
    }
    if !args.flags.is_empty() {
        fields.push(("flags", args.flags.join(",")));
    }
    if let Some(description) = &args.description {
        fields.push(("description", description.clone()));
    }
    fields
}

fn print_pretty(result: &ClassificationResult) {
    match (&result.command, result.kind) {
        (Some(command), _) => {
            let method = result.method.map_or("", |m| m.as_str());
            println!(
                "✓ {}  ({:.0}% via {method})",
                command.name,
                result.confidence * 100.0
            );
            println!("  {}", command.description);
        }
        (None, MatchKind::Ambiguous) => {
            println!("? Ambiguous, did you mean:");
            for alt in &result.alternatives {
                println!(
                    "  • {:<28} {:>3.0}%  {}",
                    alt.command.name,
                    alt.confidence * 100.0,
                    alt.command.description
                );
            }
        }
        (None, _) => println!("✗ No matching command"),
    }

    if let Some(stage) = result.lifecycle_stage {
        println!("\nStage: {stage}");
    }
    let fields = argument_summary(&result.arguments);
    if !fields.is_empty() {
        println!("Arguments:");
        for (key, value) in fields {
            println!("  {key}: {value}");
        }
    }
    if let Some(line) = invocation(result) {
        println!("\nRun: {line}");
    }
}

fn print_text(result: &ClassificationResult) {
    let mut line = format!("result  type={}", result.kind.as_str());
    if let Some(command) = &result.command {
        line.push_str(&format!("  command={}", command.name));
    }
    line.push_str(&format!("  confidence={:.3}", result.confidence));
    if let Some(method) = result.method {
        line.push_str(&format!("  method={}", method.as_str()));
    }
    if let Some(stage) = result.lifecycle_stage {
        line.push_str(&format!("  stage={stage}"));
    }
    println!("{line}");

    for alt in &result.alternatives {
        println!("alt  {}  {:.3}", alt.command.name, alt.confidence);
    }
    for (key, value) in argument_summary(&result.arguments) {
        println!("arg  {key}={value}");
    }
    if let Some(line) = invocation(result) {
        println!("invocation  {line}");
    }
}
