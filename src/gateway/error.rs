use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::debug;

use super::RADAR_STATUS_HEADER;
use crate::embedding::EmbeddingError;
use crate::ingest::IngestError;
use crate::search::SearchError;
use crate::vectordb::RetrievalError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("embedding failed: {0}")]
    EmbeddingFailed(#[from] EmbeddingError),

    #[error("retrieval failed: {0}")]
    RetrievalFailed(#[from] RetrievalError),

    #[error("issue source unavailable: {0}")]
    IngestSource(String),
}

#[derive(serde::Serialize, serde::Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl From<SearchError> for GatewayError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Embedding(e) => GatewayError::EmbeddingFailed(e),
            SearchError::Retrieval(e) => GatewayError::RetrievalFailed(e),
        }
    }
}

impl From<IngestError> for GatewayError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::Source { .. } | IngestError::Parse { .. } => {
                GatewayError::IngestSource(err.to_string())
            }
            IngestError::Embedding(e) => GatewayError::EmbeddingFailed(e),
            IngestError::Index(e) => GatewayError::RetrievalFailed(e),
        }
    }
}

impl GatewayError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            GatewayError::EmbeddingFailed(e) if e.is_timeout() => {
                (StatusCode::GATEWAY_TIMEOUT, "embedding_timeout")
            }
            GatewayError::EmbeddingFailed(_) => (StatusCode::BAD_GATEWAY, "embedding_error"),
            GatewayError::RetrievalFailed(e) if e.is_timeout() => {
                (StatusCode::GATEWAY_TIMEOUT, "retrieval_timeout")
            }
            GatewayError::RetrievalFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "retrieval_error")
            }
            GatewayError::IngestSource(_) => (StatusCode::BAD_REQUEST, "ingest_source_error"),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, radar_status) = self.status_and_kind();

        // Upstream details are logged where they occur; clients get the stage that failed.
        let error_message = match &self {
            GatewayError::EmbeddingFailed(e) => {
                debug!(error = %e, "Embedding stage failed");
                if e.is_timeout() {
                    "embedding timed out".to_string()
                } else {
                    "embedding service request failed".to_string()
                }
            }
            GatewayError::RetrievalFailed(e) => {
                debug!(error = %e, "Retrieval stage failed");
                if e.is_timeout() {
                    "retrieval timed out".to_string()
                } else {
                    "vector store request failed".to_string()
                }
            }
            _ => self.to_string(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            RADAR_STATUS_HEADER,
            HeaderValue::from_str(radar_status).unwrap_or(HeaderValue::from_static("error")),
        );

        let body = Json(ErrorResponse {
            error: error_message,
            code: status.as_u16(),
        });

        (status, headers, body).into_response()
    }
}
