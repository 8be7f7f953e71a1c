//! Embedding-similarity matching over command descriptions.

use std::collections::{HashMap, HashSet};

use super::types::CommandMetadata;

/// Errors from an embedding backend.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("embedding backend is not available at {url}")]
    Unavailable { url: String },

    #[error("embedding request failed: {message}")]
    Request { message: String },

    #[error("failed to parse embedding response: {message}")]
    Parse { message: String },

    #[error("embedding backend returned {got} vectors for {expected} inputs")]
    CountMismatch { expected: usize, got: usize },
}

/// A `text -> vector` oracle.
pub trait Embedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Cosine similarity of two vectors.
///
/// Returns 0.0 for empty, zero-norm or differently sized vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[derive(Debug, Clone, PartialEq)]
pub struct SemanticMatch {
    pub command: CommandMetadata,
    pub similarity: f64,
}

/// Ranks commands by similarity between the input and their pre-computed
/// description embeddings.
pub struct SemanticMatcher {
    embedder: Box<dyn Embedder>,
    cache: HashMap<String, (CommandMetadata, Vec<f32>)>,
    ready: bool,
}

impl SemanticMatcher {
    pub fn new(embedder: Box<dyn Embedder>) -> Self {
        Self {
            embedder,
            cache: HashMap::new(),
            ready: false,
        }
    }

    /// Text embedded for a command: `"{description}. {objective}"`.
    pub fn embedding_text(command: &CommandMetadata) -> String {
        match command.objective_text() {
            Some(objective) => format!("{}. {objective}", command.description.trim()),
            None => command.description.trim().to_string(),
        }
    }

    /// Embed every command once.
    ///
    /// On error the matcher is left not-ready.
    pub fn initialize(&mut self, commands: &[CommandMetadata]) -> Result<(), EmbedError> {
        self.ready = false;
        let texts: Vec<String> = commands.iter().map(Self::embedding_text).collect();
        let vectors = self.embedder.embed_batch(&texts)?;
        if vectors.len() != commands.len() {
            return Err(EmbedError::CountMismatch {
                expected: commands.len(),
                got: vectors.len(),
            });
        }
        self.cache = commands
            .iter()
            .cloned()
            .zip(vectors)
            .map(|(command, vector)| (command.name.clone(), (command, vector)))
            .collect();
        self.ready = true;
        tracing::info!(commands = self.cache.len(), "semantic matcher ready");
        Ok(())
    }

    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Rank cached commands in `candidates` by similarity to `input`.
    ///
    /// Embeds `input` once per call. Candidates without a cached vector are
    /// skipped.
    pub fn match_input(
        &self,
        input: &str,
        candidates: &HashSet<String>,
    ) -> Result<Vec<SemanticMatch>, EmbedError> {
        let query = self.embedder.embed(input)?;
        let mut matches: Vec<SemanticMatch> = self
            .cache
            .iter()
            .filter(|(name, _)| candidates.contains(*name))
            .map(|(_, (command, vector))| SemanticMatch {
                command: command.clone(),
                similarity: cosine_similarity(&query, vector),
            })
            .collect();
        matches.sort_by(|a, b| {
            b.similarity
                .total_cmp(&a.similarity)
                .then_with(|| a.command.name.cmp(&b.command.name))
        });
        Ok(matches)
    }
}

impl std::fmt::Debug for SemanticMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticMatcher")
            .field("cached", &self.cache.len())
            .field("ready", &self.ready)
            .finish_non_exhaustive()
    }
}
