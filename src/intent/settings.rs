//! Classifier thresholds, validated once at construction.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Invalid classifier settings. These are the only fatal errors the
/// classifier produces, and they surface from `IntentClassifier::new`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a finite value in [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("max_alternatives must be at least 1")]
    ZeroAlternatives,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum statistical confidence for a `classified` result.
    #[serde(alias = "confidenceThreshold")]
    pub confidence_threshold: f64,
    /// Minimum margin between the top two statistical candidates.
    #[serde(alias = "ambiguityGap")]
    pub ambiguity_gap: f64,
    /// Cap on alternatives carried by an `ambiguous` result.
    #[serde(alias = "maxAlternatives")]
    pub max_alternatives: usize,
    /// Minimum cosine similarity for the semantic fallback to win.
    #[serde(alias = "semanticThreshold")]
    pub semantic_threshold: f64,
    #[serde(alias = "enableSemantic")]
    pub enable_semantic: bool,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            ambiguity_gap: 0.1,
            max_alternatives: 3,
            semantic_threshold: 0.75,
            enable_semantic: false,
        }
    }
}

impl ClassifierConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("confidence_threshold", self.confidence_threshold)?;
        check_unit("ambiguity_gap", self.ambiguity_gap)?;
        check_unit("semantic_threshold", self.semantic_threshold)?;
        if self.max_alternatives == 0 {
            return Err(ConfigError::ZeroAlternatives);
        }
        Ok(())
    }
}

fn check_unit(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}
