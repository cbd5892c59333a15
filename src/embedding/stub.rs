use tracing::debug;

use super::Embedder;
use super::error::EmbeddingError;
use crate::constants::DEFAULT_EMBEDDING_DIM;
use crate::hashing::hash_text;

/// Deterministic embedder for tests and local runs without an embedding worker.
///
/// Identical text yields identical unit vectors (cosine distance 0). Unrelated texts map to
/// pseudo-random directions, which in a few hundred dimensions are close to orthogonal.
#[derive(Debug, Clone, Copy)]
pub struct StubEmbedder {
    embedding_dim: usize,
}

impl Default for StubEmbedder {
    fn default() -> Self {
        Self {
            embedding_dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl StubEmbedder {
    pub fn new(embedding_dim: usize) -> Self {
        Self { embedding_dim }
    }

    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }

    /// Synchronous form of [`Embedder::embed`].
    pub fn embed_sync(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if self.embedding_dim == 0 {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedding_dim must be non-zero".to_string(),
            });
        }

        debug!(text_len = text.len(), "Generating stub embedding");

        let mut state = hash_text(text);
        let mut embedding = Vec::with_capacity(self.embedding_dim);
        for _ in 0..self.embedding_dim {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            let value = ((state >> 32) as f32 / u32::MAX as f32) * 2.0 - 1.0;
            embedding.push(value);
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut embedding {
                *x /= norm;
            }
        }

        Ok(embedding)
    }
}

impl Embedder for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_sync(text)
    }
}
