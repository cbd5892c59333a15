use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Embedder;
use super::error::EmbeddingError;
use crate::constants::{DEFAULT_EMBEDDER_TIMEOUT, DEFAULT_EMBEDDING_DIM, validate_embedding_dim};

#[derive(Debug, Clone)]
/// Configuration for [`HttpEmbedder`].
pub struct HttpEmbedderConfig {
    /// Base URL of the embedding worker (the client appends `/embed`).
    pub base_url: String,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Expected output dimension.
    pub embedding_dim: usize,
}

impl HttpEmbedderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_EMBEDDER_TIMEOUT,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn embedding_dim(mut self, embedding_dim: usize) -> Self {
        self.embedding_dim = embedding_dim;
        self
    }

    pub fn validate(&self) -> Result<(), EmbeddingError> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(EmbeddingError::InvalidConfig {
                reason: format!("base_url must be an http(s) URL, got '{}'", self.base_url),
            });
        }
        if self.timeout.is_zero() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "timeout must be non-zero".to_string(),
            });
        }
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// Client for the embedding worker's `POST /embed` endpoint.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: reqwest::Client,
    endpoint: String,
    config: HttpEmbedderConfig,
}

impl HttpEmbedder {
    pub fn new(config: HttpEmbedderConfig) -> Result<Self, EmbeddingError> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbeddingError::InvalidConfig {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        let endpoint = format!("{}/embed", config.base_url.trim().trim_end_matches('/'));

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn config(&self) -> &HttpEmbedderConfig {
        &self.config
    }

    fn request_error(&self, err: reqwest::Error) -> EmbeddingError {
        if err.is_timeout() {
            EmbeddingError::Timeout {
                timeout: self.config.timeout,
            }
        } else {
            EmbeddingError::Request {
                reason: err.to_string(),
            }
        }
    }
}

impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let started = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest { text })
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: EmbedResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                EmbeddingError::Timeout {
                    timeout: self.config.timeout,
                }
            } else {
                EmbeddingError::Decode {
                    reason: e.to_string(),
                }
            }
        })?;

        if body.embedding.is_empty() {
            return Err(EmbeddingError::Empty);
        }
        validate_embedding_dim(body.embedding.len(), self.config.embedding_dim)?;

        debug!(
            text_len = text.len(),
            dim = body.embedding.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Embedding generated"
        );

        Ok(body.embedding)
    }
}
