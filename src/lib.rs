//! Issue Radar library crate (used by the server binary and integration tests).
//!
//! Finds issues in a repository that are semantically similar to a free-text query.
//!
//! # Pipeline
//!
//! [`SearchService`] runs one search end to end:
//! 1. [`Embedder`] turns the query into a vector ([`HttpEmbedder`] or [`StubEmbedder`]).
//! 2. [`VectorRepository`] returns the nearest issues of the requested repository.
//! 3. [`score_and_rank`] tags each candidate Strong or Weak and cuts the page.
//!
//! # Other Modules
//! - [`ingest`]: loads issues from a JSON file and indexes them.
//! - [`gateway`]: the axum HTTP surface.
//! - [`config`]: `RADAR_*` environment configuration.
//!
//! ## Test/Mock Support
//! [`MockIssueStore`] is available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod config;
pub mod constants;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod ingest;
pub mod ranking;
pub mod search;
pub mod vectordb;

pub use config::{Config, ConfigError};
pub use constants::{DimValidationError, validate_embedding_dim};
pub use embedding::{
    Embedder, EmbeddingBackend, EmbeddingError, HttpEmbedder, HttpEmbedderConfig, StubEmbedder,
};
pub use gateway::{HandlerState, create_router_with_state};
pub use hashing::{hash_text, hash_to_u64, issue_point_id};
pub use ingest::{IngestError, IngestReport, Ingestor, load_issues};
pub use ranking::{
    Confidence, RankedIssue, ThresholdError, Thresholds, score_and_rank, similarity_from_distance,
};
pub use search::{SearchConfig, SearchError, SearchOutcome, SearchService};
#[cfg(any(test, feature = "mock"))]
pub use vectordb::MockIssueStore;
pub use vectordb::{
    Candidate, IndexedIssue, IssueIndex, IssueRecord, QdrantIssueStore, RetrievalError,
    VectorRepository,
};
