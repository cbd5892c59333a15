use std::time::Duration;

use thiserror::Error;

use crate::constants::DimValidationError;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding request failed: {reason}")]
    Request { reason: String },

    #[error("embedding worker returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode embedding response: {reason}")]
    Decode { reason: String },

    #[error("embedding worker returned an empty embedding")]
    Empty,

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("embedding timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("invalid embedder configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl EmbeddingError {
    /// Returns `true` for deadline or HTTP timeout expiry.
    pub fn is_timeout(&self) -> bool {
        matches!(self, EmbeddingError::Timeout { .. })
    }
}

impl From<DimValidationError> for EmbeddingError {
    fn from(err: DimValidationError) -> Self {
        match err {
            DimValidationError::DimensionMismatch { expected, actual } => {
                EmbeddingError::DimensionMismatch { expected, actual }
            }
            DimValidationError::ZeroDimension => EmbeddingError::InvalidConfig {
                reason: err.to_string(),
            },
        }
    }
}
