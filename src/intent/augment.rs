//! Training phrase synthesis from command metadata.
//!
//! No labelled corpus exists, so each command contributes a handful of
//! phrases built from its description, objective and name.

use super::types::CommandMetadata;

/// Upper bound on phrases per command.
pub const MAX_UTTERANCES: usize = 8;

/// Alternatives per verb; only the first two are used.
const VERB_SYNONYMS: &[(&str, &[&str])] = &[
    ("plan", &["design", "prepare"]),
    ("create", &["make", "build"]),
    ("execute", &["run", "implement"]),
    ("verify", &["check", "validate"]),
    ("show", &["display", "list"]),
    ("list", &["show", "display"]),
    ("add", &["append", "insert"]),
    ("insert", &["add", "inject"]),
    ("remove", &["delete", "drop"]),
    ("complete", &["finish", "close"]),
    ("start", &["begin", "kick off"]),
    ("initialize", &["set up", "bootstrap"]),
    ("research", &["investigate", "explore"]),
    ("discuss", &["talk through", "clarify"]),
    ("audit", &["review", "inspect"]),
    ("check", &["review", "inspect"]),
    ("debug", &["troubleshoot", "diagnose"]),
    ("pause", &["stop", "suspend"]),
    ("resume", &["continue", "pick up"]),
    ("update", &["upgrade", "refresh"]),
    ("map", &["analyze", "scan"]),
    ("configure", &["set", "adjust"]),
];

/// Build up to [`MAX_UTTERANCES`] lowercase, de-duplicated phrases for `command`.
///
/// Order is description, objective, name-derived phrases, then synonym
/// variants of the description, so truncation drops the least faithful ones.
pub fn augment(command: &CommandMetadata) -> Vec<String> {
    let description = normalize(&command.description);

    let mut phrases = Vec::with_capacity(MAX_UTTERANCES + 4);
    phrases.push(description.clone());
    if let Some(objective) = command.objective_text() {
        phrases.push(normalize(objective));
    }
    phrases.extend(name_phrases(command.local_name()));
    phrases.extend(synonym_variants(&description));

    let mut out: Vec<String> = Vec::with_capacity(MAX_UTTERANCES);
    for phrase in phrases {
        if phrase.is_empty() || out.contains(&phrase) {
            continue;
        }
        out.push(phrase);
        if out.len() == MAX_UTTERANCES {
            break;
        }
    }
    out
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn name_phrases(local_name: &str) -> Vec<String> {
    let parts: Vec<&str> = local_name.split('-').filter(|p| !p.is_empty()).collect();
    match parts.as_slice() {
        [] => Vec::new(),
        [word] => vec![format!("show {word}"), format!("check {word}")],
        [verb, rest @ ..] => {
            let noun = rest.join(" ");
            vec![
                format!("{verb} a {noun}"),
                format!("{verb} the {noun}"),
                format!("i want to {verb} the {noun}"),
                format!("let's {verb} the {noun}"),
            ]
        }
    }
}

/// Swap the first recognised verb in `description` for its alternatives.
fn synonym_variants(description: &str) -> Vec<String> {
    let words: Vec<&str> = description.split(' ').collect();
    for (idx, word) in words.iter().enumerate() {
        let bare = word.trim_matches(|c: char| !c.is_alphanumeric());
        let Some((_, alternatives)) = VERB_SYNONYMS.iter().find(|(verb, _)| *verb == bare) else {
            continue;
        };
        return alternatives
            .iter()
            .take(2)
            .map(|alt| {
                let swapped = word.replacen(bare, alt, 1);
                let mut replaced = words.clone();
                replaced[idx] = swapped.as_str();
                replaced.join(" ")
            })
            .collect();
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_comes_first() {
        let cmd = CommandMetadata::new("gsd:plan-phase", "Create a detailed execution plan");
        let phrases = augment(&cmd);
        assert_eq!(phrases[0], "create a detailed execution plan");
    }

    #[test]
    fn two_part_name_generates_action_phrases() {
        let cmd = CommandMetadata::new("gsd:plan-phase", "Plan a phase");
        let phrases = augment(&cmd);
        assert!(phrases.contains(&"plan the phase".to_string()));
        assert!(phrases.contains(&"i want to plan the phase".to_string()));
        assert!(phrases.contains(&"let's plan the phase".to_string()));
        // "plan a phase" duplicates the description and appears once
        assert_eq!(phrases.iter().filter(|p| *p == "plan a phase").count(), 1);
    }

    #[test]
    fn single_word_name_generates_show_and_check() {
        let cmd = CommandMetadata::new("gsd:progress", "Report where the project stands");
        let phrases = augment(&cmd);
        assert!(phrases.contains(&"show progress".to_string()));
        assert!(phrases.contains(&"check progress".to_string()));
    }

    #[test]
    fn objective_follows_description() {
        let cmd = CommandMetadata::new("gsd:debug", "Debug an issue")
            .with_objective("Systematically find the root cause of a bug");
        let phrases = augment(&cmd);
        assert_eq!(phrases[1], "systematically find the root cause of a bug");
    }

    #[test]
    fn synonyms_replace_only_first_recognised_verb() {
        let cmd = CommandMetadata::new("gsd:quick", "Execute a quick task and verify it");
        let phrases = augment(&cmd);
        assert!(phrases.contains(&"run a quick task and verify it".to_string()));
        assert!(phrases.contains(&"implement a quick task and verify it".to_string()));
        assert!(!phrases.iter().any(|p| p.contains("validate")));
    }

    #[test]
    fn output_is_capped_and_unique() {
        let cmd = CommandMetadata::new("gsd:plan-milestone-gaps", "Plan work to close audit gaps")
            .with_objective("Turn milestone audit findings into new phases");
        let phrases = augment(&cmd);
        assert!(phrases.len() <= MAX_UTTERANCES);
        assert!(phrases.len() >= 3);
        let mut sorted = phrases.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), phrases.len());
    }

    #[test]
    fn phrases_are_lowercase_and_trimmed() {
        let cmd = CommandMetadata::new("gsd:help", "  Show   ALL commands  ");
        for phrase in augment(&cmd) {
            assert_eq!(phrase, phrase.trim());
            assert_eq!(phrase, phrase.to_lowercase());
        }
    }

    #[test]
    fn punctuation_does_not_hide_verbs() {
        let variants = synonym_variants("verify, then ship");
        assert_eq!(variants, vec!["check, then ship", "validate, then ship"]);
    }
}
