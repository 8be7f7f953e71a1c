//! The intent classification pipeline.
//!
//! Exact match, lifecycle filter, statistical classification, optional
//! semantic fallback, then confidence and ambiguity resolution. Each stage
//! either returns a result or narrows the candidates for the next one.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use super::arguments::extract_arguments;
use super::bayes::{LabelScore, NaiveBayes, TextClassifier};
use super::exact::match_exact;
use super::lifecycle::{LifecycleStage, ProjectState, derive_stage, filter_commands};
use super::semantic::{Embedder, SemanticMatcher};
use super::settings::{ClassifierConfig, ConfigError};
use super::types::{Alternative, ClassificationResult, CommandMetadata, ExtractedArguments, Method};

/// Per-call overrides for [`IntentClassifier::initialize`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    /// Overrides `ClassifierConfig::enable_semantic` when set.
    pub enable_semantic: Option<bool>,
}

/// Routes free text to a command.
///
/// One instance is meant for one caller at a time. A `classify` call made
/// while another is in flight on the same instance (for example from inside
/// an embedding backend) returns `no-match` without running any stage.
pub struct IntentClassifier {
    config: ClassifierConfig,
    commands: Vec<CommandMetadata>,
    by_name: HashMap<String, CommandMetadata>,
    text_classifier: Box<dyn TextClassifier>,
    embedder: Option<Box<dyn Embedder>>,
    semantic: Option<SemanticMatcher>,
    is_classifying: Cell<bool>,
}

impl IntentClassifier {
    /// Create a classifier with a naive Bayes model.
    ///
    /// Fails if any threshold in `config` is out of range.
    pub fn new(config: ClassifierConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            commands: Vec::new(),
            by_name: HashMap::new(),
            text_classifier: Box::new(NaiveBayes::default()),
            embedder: None,
            semantic: None,
            is_classifying: Cell::new(false),
        })
    }

    /// Replace the statistical classifier. Takes effect on the next `initialize`.
    #[must_use]
    pub fn with_text_classifier(mut self, classifier: Box<dyn TextClassifier>) -> Self {
        self.text_classifier = classifier;
        self
    }

    /// Embedding backend used by `initialize` when semantic fallback is enabled.
    #[must_use]
    pub fn with_embedder(mut self, embedder: Box<dyn Embedder>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Store `commands`, train the statistical model and, if enabled, embed
    /// command descriptions.
    ///
    /// A matcher injected with [`set_semantic_matcher`](Self::set_semantic_matcher)
    /// that is already ready is kept untouched. Otherwise, when semantic
    /// fallback is enabled, the injected matcher or one built from the
    /// embedder is initialized; embedding failures disable the fallback for
    /// the session instead of failing initialization.
    pub fn initialize(&mut self, commands: Vec<CommandMetadata>, options: InitOptions) {
        self.by_name = commands
            .iter()
            .map(|c| (c.name.clone(), c.clone()))
            .collect();
        self.commands = commands;
        self.text_classifier.train(&self.commands);

        let enable_semantic = options
            .enable_semantic
            .unwrap_or(self.config.enable_semantic);
        if self.semantic_ready() {
            tracing::debug!("keeping injected semantic matcher");
        } else if enable_semantic {
            let matcher = self
                .semantic
                .take()
                .or_else(|| self.embedder.take().map(SemanticMatcher::new));
            self.semantic = matcher.and_then(|m| init_semantic_matcher(m, &self.commands));
        }

        tracing::info!(
            commands = self.commands.len(),
            semantic = self.semantic_ready(),
            "intent classifier initialized"
        );
    }

    /// Inject a matcher, typically one already initialized elsewhere.
    pub fn set_semantic_matcher(&mut self, matcher: SemanticMatcher) {
        self.semantic = Some(matcher);
    }

    pub fn semantic_ready(&self) -> bool {
        self.semantic.as_ref().is_some_and(SemanticMatcher::is_ready)
    }

    pub fn commands(&self) -> &[CommandMetadata] {
        &self.commands
    }

    pub const fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Commands eligible for classification in the given project state.
    pub fn candidates(&self, state: &ProjectState) -> (LifecycleStage, Vec<CommandMetadata>) {
        let stage = derive_stage(state);
        (stage, filter_commands(&self.commands, stage))
    }

    /// Classify `input` against the known commands. Never fails.
    pub fn classify(&self, input: &str, state: &ProjectState) -> ClassificationResult {
        let Some(_guard) = ClassifyGuard::enter(&self.is_classifying) else {
            tracing::debug!("nested classify call rejected");
            let arguments = ExtractedArguments {
                raw: input.trim().to_string(),
                ..Default::default()
            };
            return ClassificationResult::no_match(arguments, None);
        };
        self.run_pipeline(input.trim(), state)
    }

    fn run_pipeline(&self, input: &str, state: &ProjectState) -> ClassificationResult {
        if input.is_empty() {
            return ClassificationResult::no_match(extract_arguments(input), None);
        }

        if let Some(exact) = match_exact(input, &self.by_name) {
            tracing::debug!(command = %exact.command.name, "exact match");
            return ClassificationResult::exact(
                exact.command.clone(),
                extract_arguments(&exact.raw_args),
            );
        }

        let arguments = extract_arguments(input);
        let (stage, candidates) = self.candidates(state);
        tracing::debug!(%stage, candidates = candidates.len(), "lifecycle filter applied");
        if candidates.is_empty() {
            return ClassificationResult::no_match(arguments, Some(stage));
        }

        let valid: HashSet<String> = candidates.into_iter().map(|c| c.name).collect();
        let ranked = self.text_classifier.classify(input, &valid);
        let Some(top) = ranked.first() else {
            tracing::debug!(%stage, "no statistical match");
            return ClassificationResult::no_match(arguments, Some(stage));
        };
        tracing::debug!(label = %top.label, confidence = top.confidence, "statistical top");

        if top.confidence < self.config.confidence_threshold {
            if let Some(result) = self.semantic_fallback(input, &valid, &arguments, stage) {
                return result;
            }
        }

        self.resolve(&ranked, arguments, stage)
    }

    /// Adopt the best semantic candidate if it clears `semantic_threshold`.
    fn semantic_fallback(
        &self,
        input: &str,
        valid: &HashSet<String>,
        arguments: &ExtractedArguments,
        stage: LifecycleStage,
    ) -> Option<ClassificationResult> {
        let matcher = self.semantic.as_ref().filter(|m| m.is_ready())?;
        let matches = match matcher.match_input(input, valid) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::warn!(error = %e, "semantic fallback failed");
                return None;
            }
        };
        let best = matches.into_iter().next()?;
        tracing::debug!(
            command = %best.command.name,
            similarity = best.similarity,
            "semantic top"
        );
        (best.similarity >= self.config.semantic_threshold).then(|| {
            ClassificationResult::classified(
                best.command,
                best.similarity,
                Method::Semantic,
                arguments.clone(),
                stage,
            )
        })
    }

    /// Pick a confident winner or fall back to ranked alternatives.
    fn resolve(
        &self,
        ranked: &[LabelScore],
        arguments: ExtractedArguments,
        stage: LifecycleStage,
    ) -> ClassificationResult {
        let (top, second) = match ranked {
            [] => return ClassificationResult::no_match(arguments, Some(stage)),
            [top] => (top, None),
            [top, second, ..] => (top, Some(second)),
        };

        // A lone candidate is never ambiguous for lack of competitors.
        let gap = second.map_or(1.0, |s| top.confidence - s.confidence);
        let meets_threshold = top.confidence >= self.config.confidence_threshold;
        let meets_gap = gap >= self.config.ambiguity_gap;

        if meets_threshold && meets_gap {
            if let Some(command) = self.by_name.get(&top.label) {
                return ClassificationResult::classified(
                    command.clone(),
                    top.confidence,
                    Method::Bayes,
                    arguments,
                    stage,
                );
            }
            tracing::warn!(label = %top.label, "classifier returned unknown command");
            return ClassificationResult::no_match(arguments, Some(stage));
        }

        let alternatives: Vec<Alternative> = ranked
            .iter()
            .filter_map(|score| {
                self.by_name.get(&score.label).map(|command| Alternative {
                    command: command.clone(),
                    confidence: score.confidence,
                })
            })
            .take(self.config.max_alternatives)
            .collect();
        tracing::debug!(
            alternatives = alternatives.len(),
            gap,
            meets_threshold,
            "ambiguous classification"
        );
        ClassificationResult::ambiguous(alternatives, arguments.clone(), stage)
            .unwrap_or_else(|| ClassificationResult::no_match(arguments, Some(stage)))
    }
}

impl std::fmt::Debug for IntentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentClassifier")
            .field("config", &self.config)
            .field("commands", &self.commands.len())
            .field("semantic", &self.semantic)
            .finish_non_exhaustive()
    }
}

/// `None` means semantic fallback is disabled for the session.
fn init_semantic_matcher(
    mut matcher: SemanticMatcher,
    commands: &[CommandMetadata],
) -> Option<SemanticMatcher> {
    match matcher.initialize(commands) {
        Ok(()) => Some(matcher),
        Err(e) => {
            tracing::warn!(error = %e, "semantic matcher unavailable, using statistical classification only");
            None
        }
    }
}

/// Holds the re-entrancy flag for one `classify` call; clears it on drop,
/// including during unwinding.
struct ClassifyGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> ClassifyGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self { flag })
    }
}

impl Drop for ClassifyGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
