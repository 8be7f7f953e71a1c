//! Natural-language intent routing for slash commands.

pub mod arguments;
pub mod augment;
pub mod bayes;
pub mod classifier;
pub mod exact;
pub mod lifecycle;
pub mod ollama;
pub mod semantic;
pub mod settings;
pub mod types;

pub use arguments::extract_arguments;
pub use augment::augment;
pub use bayes::{LabelScore, NaiveBayes, TextClassifier};
pub use classifier::{InitOptions, IntentClassifier};
pub use lifecycle::{LifecycleStage, Phase, Plan, ProjectState, derive_stage, filter_commands};
pub use ollama::{EmbeddingConfig, OllamaEmbedder};
pub use semantic::{EmbedError, Embedder, SemanticMatch, SemanticMatcher, cosine_similarity};
pub use settings::{ClassifierConfig, ConfigError};
pub use types::{
    Alternative, ClassificationResult, CommandMetadata, ExtractedArguments, MatchKind, Method,
};
