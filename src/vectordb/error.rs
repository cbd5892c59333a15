use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by the vector repository.
pub enum RetrievalError {
    /// Could not connect to the Qdrant endpoint.
    #[error("failed to connect to Qdrant at '{url}': {message}")]
    ConnectionFailed {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// Collection creation or inspection failed.
    #[error("collection '{collection}' unavailable: {message}")]
    CollectionFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Nearest-neighbor query failed.
    #[error("failed to search in '{collection}': {message}")]
    SearchFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Upsert failed.
    #[error("failed to upsert issues to '{collection}': {message}")]
    UpsertFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Listing (scroll) failed.
    #[error("failed to list issues in '{collection}': {message}")]
    ScrollFailed {
        /// Collection name.
        collection: String,
        /// Error message.
        message: String,
    },

    /// Vector dimension mismatch.
    #[error("invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        /// Expected dimension.
        expected: usize,
        /// Actual dimension.
        actual: usize,
    },

    /// The search deadline expired while waiting on the store.
    #[error("retrieval timed out after {timeout:?}")]
    Timeout {
        /// Overall deadline that was exceeded.
        timeout: Duration,
    },
}

impl RetrievalError {
    /// Returns `true` for deadline expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, RetrievalError::Timeout { .. })
    }
}
