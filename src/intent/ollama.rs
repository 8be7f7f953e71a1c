//! Ollama embedding backend (`POST /api/embed`).

use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::semantic::{EmbedError, Embedder};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Base URL of the Ollama server.
    #[serde(alias = "baseUrl")]
    pub base_url: String,
    /// Embedding model name.
    pub model: String,
    /// Per-request timeout in seconds.
    #[serde(alias = "timeoutSecs")]
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "nomic-embed-text".into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

pub struct OllamaEmbedder {
    config: EmbeddingConfig,
    agent: ureq::Agent,
}

impl OllamaEmbedder {
    pub fn new(config: EmbeddingConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_secs)))
            .build()
            .into();
        Self { config, agent }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/embed", self.config.base_url.trim_end_matches('/'))
    }

    fn map_error(&self, err: &ureq::Error) -> EmbedError {
        match err {
            ureq::Error::ConnectionFailed | ureq::Error::HostNotFound | ureq::Error::Io(_) => {
                EmbedError::Unavailable {
                    url: self.config.base_url.clone(),
                }
            }
            other => EmbedError::Request {
                message: other.to_string(),
            },
        }
    }
}

impl Embedder for OllamaEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let input = [text.to_string()];
        self.embed_batch(&input)?
            .pop()
            .ok_or(EmbedError::CountMismatch {
                expected: 1,
                got: 0,
            })
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let request = EmbedRequest {
            model: &self.config.model,
            input: texts,
        };
        let mut response = self
            .agent
            .post(&self.endpoint())
            .send_json(&request)
            .map_err(|e| self.map_error(&e))?;
        let parsed: EmbedResponse =
            response
                .body_mut()
                .read_json()
                .map_err(|e| EmbedError::Parse {
                    message: e.to_string(),
                })?;
        if parsed.embeddings.len() != texts.len() {
            return Err(EmbedError::CountMismatch {
                expected: texts.len(),
                got: parsed.embeddings.len(),
            });
        }
        Ok(parsed.embeddings)
    }
}

impl std::fmt::Debug for OllamaEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaEmbedder")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "nomic-embed-text");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let embedder = OllamaEmbedder::new(EmbeddingConfig {
            base_url: "http://localhost:11434/".into(),
            ..Default::default()
        });
        assert_eq!(embedder.endpoint(), "http://localhost:11434/api/embed");
    }

    #[test]
    fn empty_batch_makes_no_request() {
        let embedder = OllamaEmbedder::new(EmbeddingConfig {
            base_url: "http://127.0.0.1:1".into(),
            ..Default::default()
        });
        assert!(embedder.embed_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn unreachable_backend_returns_error() {
        let embedder = OllamaEmbedder::new(EmbeddingConfig {
            base_url: "http://127.0.0.1:1".into(), // unreachable port
            timeout_secs: 2,
            ..Default::default()
        });
        assert!(embedder.embed("plan the next phase").is_err());
    }
}
