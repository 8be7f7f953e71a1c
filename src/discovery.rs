//! Command discovery from `<dir>/<namespace>/<command>.md` files.
//!
//! Each file starts with YAML frontmatter carrying `description` and
//! optionally `name`. An `<objective>...</objective>` block in the body, if
//! present, becomes the command objective.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use regex::Regex;
use serde::Deserialize;

use crate::error::ExitError;
use crate::intent::CommandMetadata;
use crate::intent::types::NAMESPACE_SEPARATOR;

#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

fn objective_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<objective>(.*?)</objective>").expect("objective pattern is valid")
    })
}

/// Discover every command under `dir`, sorted by name.
///
/// Files that cannot be parsed or have no description are skipped. When two
/// files declare the same name, the first in path order wins.
pub fn discover_commands(dir: &Path) -> anyhow::Result<Vec<CommandMetadata>> {
    if !dir.is_dir() {
        return Err(ExitError::NotFound {
            what: format!("commands directory {}", dir.display()),
        }
        .into());
    }

    let mut seen = HashSet::new();
    let mut commands = Vec::new();
    for namespace_dir in sorted_entries(dir)? {
        if !namespace_dir.is_dir() {
            continue;
        }
        let Some(namespace) = namespace_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        for path in sorted_entries(&namespace_dir)? {
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(command) = load_command(&path, namespace)? else {
                continue;
            };
            if seen.insert(command.name.clone()) {
                commands.push(command);
            } else {
                tracing::debug!(
                    name = %command.name,
                    path = %path.display(),
                    "duplicate command name, keeping first"
                );
            }
        }
    }

    commands.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(dir = %dir.display(), count = commands.len(), "discovered commands");
    Ok(commands)
}

fn sorted_entries(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("reading {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("listing {}", dir.display()))?;
    entries.sort();
    Ok(entries)
}

fn load_command(path: &Path, namespace: &str) -> anyhow::Result<Option<CommandMetadata>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return Ok(None);
    };
    let default_name = format!("{namespace}{NAMESPACE_SEPARATOR}{stem}");
    match parse_command(&contents, &default_name) {
        Ok(Some(mut command)) => {
            command.file_path = path.display().to_string();
            Ok(Some(command))
        }
        Ok(None) => {
            tracing::debug!(path = %path.display(), "skipping command without description");
            Ok(None)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unparseable command file");
            Ok(None)
        }
    }
}

/// Parse one command file. `Ok(None)` means the file has no description.
pub fn parse_command(contents: &str, default_name: &str) -> anyhow::Result<Option<CommandMetadata>> {
    let normalized = normalize_content(contents);
    let (yaml, body) = split_frontmatter(&normalized)
        .context("command file must start with YAML frontmatter (---)")?;

    let frontmatter: Frontmatter = if yaml.trim().is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml).context("failed to parse YAML frontmatter")?
    };

    let Some(description) = frontmatter
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
    else {
        return Ok(None);
    };
    let name = frontmatter
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| default_name.to_string());

    let mut command = CommandMetadata::new(&name, &description);
    if let Some(objective) = objective_re()
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|o| !o.is_empty())
    {
        command = command.with_objective(objective);
    }
    Ok(Some(command))
}

/// Strip a UTF-8 BOM and normalize line endings to LF.
fn normalize_content(content: &str) -> String {
    let content = content.strip_prefix('\u{FEFF}').unwrap_or(content);
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split `---` delimited frontmatter from the body.
fn split_frontmatter(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---\n")?;
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}
