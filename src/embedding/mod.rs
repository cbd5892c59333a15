//! Query and issue embedding.
//!
//! - [`HttpEmbedder`] calls the embedding worker over HTTP.
//! - [`StubEmbedder`] produces deterministic vectors without a worker.
//! - [`EmbeddingBackend`] picks one at startup so the server has a single concrete type.

mod error;
/// HTTP client for the embedding worker.
pub mod http;
/// Deterministic stub embedder.
pub mod stub;


pub use error::EmbeddingError;
pub use http::{HttpEmbedder, HttpEmbedderConfig};
pub use stub::StubEmbedder;

/// Converts text into a fixed-dimension vector.
pub trait Embedder: Send + Sync {
    /// Embeds non-empty `text`. Returns a non-empty vector of the agreed dimension.
    fn embed(
        &self,
        text: &str,
    ) -> impl std::future::Future<Output = Result<Vec<f32>, EmbeddingError>> + Send;
}

/// Embedder selected from configuration.
#[derive(Debug, Clone)]
pub enum EmbeddingBackend {
    Http(HttpEmbedder),
    Stub(StubEmbedder),
}

impl EmbeddingBackend {
    /// `"http"` or `"stub"`, reported by the readiness endpoint.
    pub fn mode(&self) -> &'static str {
        match self {
            EmbeddingBackend::Http(_) => "http",
            EmbeddingBackend::Stub(_) => "stub",
        }
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self, EmbeddingBackend::Stub(_))
    }
}

impl Embedder for EmbeddingBackend {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        match self {
            EmbeddingBackend::Http(embedder) => embedder.embed(text).await,
            EmbeddingBackend::Stub(embedder) => embedder.embed(text).await,
        }
    }
}
