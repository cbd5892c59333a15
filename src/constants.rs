//! Cross-cutting, shared constants.
//!
//! # Dimension Invariants
//!
//! The embedding dimension is agreed ahead of time between the embedding worker and the
//! vector index; there is no runtime negotiation. [`validate_embedding_dim`] is used at the
//! embedder boundary so a misconfigured worker fails the request instead of corrupting
//! nearest-neighbor results.

use std::time::Duration;

use thiserror::Error;

/// Output dimension of `all-MiniLM-L6-v2`, the model served by the embedding worker.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

pub const DEFAULT_VECTOR_SIZE_U64: u64 = DEFAULT_EMBEDDING_DIM as u64;

/// Result page size used when the caller does not ask for one.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Upper bound on a single result page (and on the candidates fetched per search).
pub const MAX_SEARCH_LIMIT: usize = 20;

/// Overall deadline covering embedding plus retrieval for one search.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-call HTTP timeout for the embedding worker.
pub const DEFAULT_EMBEDDER_TIMEOUT: Duration = Duration::from_secs(5);

pub const DEFAULT_STRONG_THRESHOLD: f64 = 0.5;

pub const DEFAULT_WEAK_THRESHOLD: f64 = 0.3;

/// Message returned alongside an empty (but successful) search.
pub const NO_MATCH_MESSAGE: &str = "no sufficiently similar issues found";

/// Error returned when dimension validation fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimValidationError {
    /// Embedding dimension cannot be zero.
    #[error("embedding dimension cannot be zero")]
    ZeroDimension,
    /// Runtime dimension does not match expected dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Validates that a runtime embedding dimension matches the expected dimension.
///
/// # Example
///
/// ```
/// use radar::constants::{validate_embedding_dim, DEFAULT_EMBEDDING_DIM};
///
/// validate_embedding_dim(384, DEFAULT_EMBEDDING_DIM).unwrap();
/// assert!(validate_embedding_dim(768, DEFAULT_EMBEDDING_DIM).is_err());
/// ```
pub fn validate_embedding_dim(actual: usize, expected: usize) -> Result<(), DimValidationError> {
    if expected == 0 {
        return Err(DimValidationError::ZeroDimension);
    }
    if actual != expected {
        return Err(DimValidationError::DimensionMismatch { expected, actual });
    }
    Ok(())
}
