//! Value types shared by every pipeline stage.

use serde::{Deserialize, Serialize};

use super::lifecycle::LifecycleStage;

/// Separator between a command's namespace and its local name (`gsd:plan-phase`).
pub const NAMESPACE_SEPARATOR: char = ':';

/// A discovered command the assistant can be asked to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandMetadata {
    /// Namespaced name, e.g. `gsd:plan-phase`.
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    pub file_path: String,
}

impl CommandMetadata {
    pub fn new(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            objective: None,
            file_path: String::new(),
        }
    }

    #[must_use]
    pub fn with_objective(mut self, objective: &str) -> Self {
        self.objective = Some(objective.to_string());
        self
    }

    /// The part of the name after the namespace separator.
    ///
    /// Names without a namespace are returned whole.
    pub fn local_name(&self) -> &str {
        self.name
            .split_once(NAMESPACE_SEPARATOR)
            .map_or(self.name.as_str(), |(_, local)| local)
    }

    /// Objective text, treating blank objectives as absent.
    pub fn objective_text(&self) -> Option<&str> {
        self.objective
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
    }

    /// Slash-prefixed invocation line for this command.
    pub fn invocation(&self, raw_args: &str) -> String {
        let raw_args = raw_args.trim();
        if raw_args.is_empty() {
            format!("/{}", self.name)
        } else {
            format!("/{} {raw_args}", self.name)
        }
    }
}

/// Structured fields parsed from the trailing user text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedArguments {
    pub phase_number: Option<String>,
    pub flags: Vec<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub profile: Option<String>,
    pub raw: String,
}

/// Which way the pipeline terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    ExactMatch,
    Classified,
    Ambiguous,
    NoMatch,
}

impl MatchKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExactMatch => "exact-match",
            Self::Classified => "classified",
            Self::Ambiguous => "ambiguous",
            Self::NoMatch => "no-match",
        }
    }
}

/// Strategy that produced a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Exact,
    Bayes,
    Semantic,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Bayes => "bayes",
            Self::Semantic => "semantic",
        }
    }
}

/// A ranked candidate offered when the classifier cannot decide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub command: CommandMetadata,
    pub confidence: f64,
}

/// Outcome of one `classify()` call.
///
/// Built only through the constructors below, which keep `command`,
/// `confidence` and `alternatives` consistent with `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    #[serde(rename = "type")]
    pub kind: MatchKind,
    pub command: Option<CommandMetadata>,
    pub confidence: f64,
    pub arguments: ExtractedArguments,
    pub alternatives: Vec<Alternative>,
    pub lifecycle_stage: Option<LifecycleStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<Method>,
}

impl ClassificationResult {
    pub const fn exact(command: CommandMetadata, arguments: ExtractedArguments) -> Self {
        Self {
            kind: MatchKind::ExactMatch,
            command: Some(command),
            confidence: 1.0,
            arguments,
            alternatives: Vec::new(),
            lifecycle_stage: None,
            method: Some(Method::Exact),
        }
    }

    /// A confident statistical or semantic match.
    ///
    /// Confidence is clamped below 1.0, which is reserved for exact matches.
    pub fn classified(
        command: CommandMetadata,
        confidence: f64,
        method: Method,
        arguments: ExtractedArguments,
        stage: LifecycleStage,
    ) -> Self {
        Self {
            kind: MatchKind::Classified,
            command: Some(command),
            confidence: confidence.clamp(0.0, MAX_CLASSIFIED_CONFIDENCE),
            arguments,
            alternatives: Vec::new(),
            lifecycle_stage: Some(stage),
            method: Some(method),
        }
    }

    /// Returns `None` when `alternatives` is empty; callers fall back to
    /// [`ClassificationResult::no_match`].
    pub fn ambiguous(
        alternatives: Vec<Alternative>,
        arguments: ExtractedArguments,
        stage: LifecycleStage,
    ) -> Option<Self> {
        let confidence = alternatives.first()?.confidence;
        Some(Self {
            kind: MatchKind::Ambiguous,
            command: None,
            confidence: confidence.clamp(0.0, MAX_CLASSIFIED_CONFIDENCE),
            arguments,
            alternatives,
            lifecycle_stage: Some(stage),
            method: Some(Method::Bayes),
        })
    }

    pub const fn no_match(arguments: ExtractedArguments, stage: Option<LifecycleStage>) -> Self {
        Self {
            kind: MatchKind::NoMatch,
            command: None,
            confidence: 0.0,
            arguments,
            alternatives: Vec::new(),
            lifecycle_stage: stage,
            method: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.command.is_some()
    }
}

const MAX_CLASSIFIED_CONFIDENCE: f64 = 0.999_999;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_name_strips_namespace() {
        let cmd = CommandMetadata::new("gsd:plan-phase", "Plan a phase");
        assert_eq!(cmd.local_name(), "plan-phase");

        let bare = CommandMetadata::new("help", "Show help");
        assert_eq!(bare.local_name(), "help");
    }

    #[test]
    fn blank_objective_is_absent() {
        let cmd = CommandMetadata::new("gsd:help", "Show help").with_objective("   ");
        assert_eq!(cmd.objective_text(), None);
    }

    #[test]
    fn invocation_omits_empty_args() {
        let cmd = CommandMetadata::new("gsd:plan-phase", "Plan a phase");
        assert_eq!(cmd.invocation(""), "/gsd:plan-phase");
        assert_eq!(cmd.invocation(" 3 --research "), "/gsd:plan-phase 3 --research");
    }

    #[test]
    fn exact_result_has_full_confidence() {
        let cmd = CommandMetadata::new("gsd:help", "Show help");
        let result = ClassificationResult::exact(cmd, ExtractedArguments::default());
        assert_eq!(result.kind, MatchKind::ExactMatch);
        assert!((result.confidence - 1.0).abs() < f64::EPSILON);
        assert_eq!(result.method, Some(Method::Exact));
        assert!(result.lifecycle_stage.is_none());
    }

    #[test]
    fn classified_confidence_never_reaches_one() {
        let cmd = CommandMetadata::new("gsd:help", "Show help");
        let result = ClassificationResult::classified(
            cmd,
            1.0,
            Method::Semantic,
            ExtractedArguments::default(),
            LifecycleStage::Executing,
        );
        assert!(result.confidence < 1.0);
    }

    #[test]
    fn ambiguous_requires_alternatives() {
        let result = ClassificationResult::ambiguous(
            Vec::new(),
            ExtractedArguments::default(),
            LifecycleStage::Roadmapped,
        );
        assert!(result.is_none());
    }

    #[test]
    fn result_serializes_with_type_tag() {
        let result = ClassificationResult::no_match(
            ExtractedArguments::default(),
            Some(LifecycleStage::MilestoneEnd),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["type"], "no-match");
        assert_eq!(json["lifecycleStage"], "milestone-end");
        assert!(json["command"].is_null());
        assert!(json.get("method").is_none());
    }
}
