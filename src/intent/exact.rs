//! Explicit `/namespace:command args` syntax.
//!
//! Only the slash-prefixed form matches. A bare `namespace:command` is left
//! for the statistical stages, and an unknown name falls through rather than
//! erroring.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use super::types::CommandMetadata;

fn explicit_syntax() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)^/([a-z][a-z0-9-]*:[a-z][a-z0-9-]*)(?:\s+(.*))?$")
            .expect("explicit command pattern is valid")
    })
}

/// A command named explicitly by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactMatch<'a> {
    pub command: &'a CommandMetadata,
    /// Trimmed text after the command name, empty when absent.
    pub raw_args: String,
}

/// Match `input` against the explicit syntax and look the name up in `commands`.
pub fn match_exact<'a>(
    input: &str,
    commands: &'a HashMap<String, CommandMetadata>,
) -> Option<ExactMatch<'a>> {
    let caps = explicit_syntax().captures(input.trim())?;
    let name = caps.get(1)?.as_str();
    let Some(command) = commands.get(name) else {
        tracing::debug!(name, "explicit command not found, falling through");
        return None;
    };
    let raw_args = caps
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();
    Some(ExactMatch { command, raw_args })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands() -> HashMap<String, CommandMetadata> {
        [
            CommandMetadata::new("gsd:plan-phase", "Create a detailed plan for a phase"),
            CommandMetadata::new("gsd:help", "Show available commands"),
            CommandMetadata::new("gsd:v2-migrate", "Migrate project layout"),
        ]
        .into_iter()
        .map(|c| (c.name.clone(), c))
        .collect()
    }

    #[test]
    fn matches_explicit_syntax_with_args() {
        let cmds = commands();
        let m = match_exact("/gsd:plan-phase 3 --research", &cmds).unwrap();
        assert_eq!(m.command.name, "gsd:plan-phase");
        assert_eq!(m.raw_args, "3 --research");
    }

    #[test]
    fn matches_without_args() {
        let cmds = commands();
        let m = match_exact("  /gsd:help  ", &cmds).unwrap();
        assert_eq!(m.command.name, "gsd:help");
        assert_eq!(m.raw_args, "");
    }

    #[test]
    fn digits_allowed_after_first_letter() {
        let cmds = commands();
        assert!(match_exact("/gsd:v2-migrate", &cmds).is_some());
    }

    #[test]
    fn bare_name_without_slash_does_not_match() {
        let cmds = commands();
        assert!(match_exact("gsd:plan-phase 3", &cmds).is_none());
        assert!(match_exact("plan-phase", &cmds).is_none());
    }

    #[test]
    fn unknown_command_falls_through() {
        let cmds = commands();
        assert!(match_exact("/gsd:launch-rockets now", &cmds).is_none());
    }

    #[test]
    fn identifier_must_start_with_letter() {
        let cmds = commands();
        assert!(match_exact("/gsd:3-plan", &cmds).is_none());
    }

    #[test]
    fn uppercase_is_not_explicit_syntax() {
        let cmds = commands();
        assert!(match_exact("/GSD:Plan-Phase", &cmds).is_none());
    }

    #[test]
    fn trailing_text_must_be_whitespace_separated() {
        let cmds = commands();
        assert!(match_exact("/gsd:help!", &cmds).is_none());
    }

    #[test]
    fn multiline_args_are_kept() {
        let cmds = commands();
        let m = match_exact("/gsd:plan-phase 2\nfocus on auth", &cmds).unwrap();
        assert_eq!(m.raw_args, "2\nfocus on auth");
    }
}
