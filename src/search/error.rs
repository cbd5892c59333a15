use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::RetrievalError;

/// Failure of one search, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("embedding stage failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("retrieval stage failed: {0}")]
    Retrieval(#[from] RetrievalError),
}

impl SearchError {
    /// Stage name: `"embedding"` or `"retrieval"`.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::Embedding(_) => "embedding",
            SearchError::Retrieval(_) => "retrieval",
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            SearchError::Embedding(e) => e.is_timeout(),
            SearchError::Retrieval(e) => e.is_timeout(),
        }
    }
}
