//! Statistical text classification over augmented command utterances.

use std::collections::{HashMap, HashSet};

use super::augment::augment;
use super::types::CommandMetadata;

/// A ranked label with normalized confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelScore {
    pub label: String,
    pub confidence: f64,
}

impl LabelScore {
    pub fn new(label: &str, confidence: f64) -> Self {
        Self {
            label: label.to_string(),
            confidence,
        }
    }
}

/// A trainable classifier from utterance to command name.
///
/// `classify` must only return labels contained in `valid_names`, sorted by
/// descending confidence. An empty list means nothing cleared the
/// implementation's internal floor.
pub trait TextClassifier {
    fn train(&mut self, commands: &[CommandMetadata]);

    fn classify(&self, input: &str, valid_names: &HashSet<String>) -> Vec<LabelScore>;
}

#[derive(Debug, Clone, Default)]
struct LabelModel {
    documents: usize,
    token_counts: HashMap<String, usize>,
    total_tokens: usize,
}

/// Multinomial naive Bayes with Laplace smoothing.
///
/// Posteriors are renormalized over the requested label subset, so
/// out-of-stage labels contribute no probability mass.
#[derive(Debug, Clone)]
pub struct NaiveBayes {
    labels: HashMap<String, LabelModel>,
    vocabulary: HashSet<String>,
    documents: usize,
    min_confidence: f64,
}

impl Default for NaiveBayes {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONFIDENCE)
    }
}

pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.01;

impl NaiveBayes {
    pub fn new(min_confidence: f64) -> Self {
        Self {
            labels: HashMap::new(),
            vocabulary: HashSet::new(),
            documents: 0,
            min_confidence,
        }
    }

    /// Add one training document for `label`.
    pub fn add_document(&mut self, label: &str, text: &str) {
        let tokens = tokenize(text);
        let model = self.labels.entry(label.to_string()).or_default();
        model.documents += 1;
        model.total_tokens += tokens.len();
        for token in tokens {
            self.vocabulary.insert(token.clone());
            *model.token_counts.entry(token).or_insert(0) += 1;
        }
        self.documents += 1;
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    #[allow(clippy::cast_precision_loss)]
    fn log_likelihood(&self, model: &LabelModel, tokens: &[String]) -> f64 {
        let vocab = self.vocabulary.len() as f64;
        let prior = (model.documents as f64 / self.documents.max(1) as f64).ln();
        let denominator = model.total_tokens as f64 + vocab;
        tokens.iter().fold(prior, |acc, token| {
            let count = model.token_counts.get(token).copied().unwrap_or(0) as f64;
            acc + ((count + 1.0) / denominator).ln()
        })
    }
}

impl TextClassifier for NaiveBayes {
    fn train(&mut self, commands: &[CommandMetadata]) {
        self.labels.clear();
        self.vocabulary.clear();
        self.documents = 0;
        for command in commands {
            for utterance in augment(command) {
                self.add_document(&command.name, &utterance);
            }
        }
        tracing::debug!(
            labels = self.labels.len(),
            documents = self.documents,
            vocabulary = self.vocabulary.len(),
            "trained naive bayes"
        );
    }

    fn classify(&self, input: &str, valid_names: &HashSet<String>) -> Vec<LabelScore> {
        let tokens: Vec<String> = tokenize(input)
            .into_iter()
            .filter(|t| self.vocabulary.contains(t))
            .collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(&str, f64)> = self
            .labels
            .iter()
            .filter(|(name, _)| valid_names.contains(*name))
            .map(|(name, model)| (name.as_str(), self.log_likelihood(model, &tokens)))
            .collect();
        // fixed summation order keeps confidences reproducible across instances
        scored.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let Some(max) = scored.iter().map(|(_, s)| *s).reduce(f64::max) else {
            return Vec::new();
        };
        let total: f64 = scored.iter().map(|(_, s)| (s - max).exp()).sum();

        let mut ranked: Vec<LabelScore> = scored
            .into_iter()
            .map(|(name, s)| LabelScore::new(name, (s - max).exp() / total))
            .filter(|s| s.confidence > self.min_confidence)
            .collect();
        ranked.sort_by(|a, b| {
            b.confidence
                .total_cmp(&a.confidence)
                .then_with(|| a.label.cmp(&b.label))
        });
        ranked
    }
}

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "to", "of", "for", "and", "or", "in", "on", "at", "is", "it", "this",
    "that", "i", "me", "my", "we", "our", "us", "be", "with", "let", "s", "please", "want",
];

/// Lowercase, split on non-alphanumerics, drop stopwords and stem.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOPWORDS.contains(w))
        .map(stem)
        .collect()
}

/// Light suffix stripping so "planning", "planned" and "plan" share a token.
fn stem(word: &str) -> String {
    let mut w = word.to_string();
    if w.len() > 4 && w.ends_with("ies") {
        w.truncate(w.len() - 3);
        w.push('y');
    } else if w.len() > 3 && w.ends_with('s') && !w.ends_with("ss") {
        w.pop();
    }

    if w.len() > 5 && w.ends_with("ing") {
        w.truncate(w.len() - 3);
    } else if w.len() > 4 && w.ends_with("ed") {
        w.truncate(w.len() - 2);
    }

    let bytes = w.as_bytes();
    if bytes.len() > 3 {
        let last = bytes[bytes.len() - 1];
        let prev = bytes[bytes.len() - 2];
        if last == prev && last.is_ascii_alphabetic() && !matches!(last, b'l' | b's' | b'z') {
            w.pop();
        }
    }

    if w.len() > 4 && w.ends_with('e') {
        w.pop();
    }
    w
}
