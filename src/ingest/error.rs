use std::path::PathBuf;

use thiserror::Error;

use crate::embedding::EmbeddingError;
use crate::vectordb::RetrievalError;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read issue source {path}: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid issue source {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to embed issue: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("failed to index issues: {0}")]
    Index(#[from] RetrievalError),
}

impl IngestError {
    /// `true` when the issue file itself is missing or malformed.
    pub fn is_source_error(&self) -> bool {
        matches!(self, IngestError::Source { .. } | IngestError::Parse { .. })
    }
}
