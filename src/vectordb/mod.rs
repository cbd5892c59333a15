//! Issue storage and nearest-neighbor retrieval (Qdrant).
//!
//! Two capabilities are split across traits:
//! - [`VectorRepository`] is the read path the search pipeline depends on.
//! - [`IssueIndex`] covers collection setup, ingestion writes, listing, and health.
//!
//! [`QdrantIssueStore`] implements both; [`MockIssueStore`] is an in-memory stand-in for tests.

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;


pub use client::{IssueIndex, QdrantIssueStore, VectorRepository};
pub use error::RetrievalError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockIssueStore, cosine_distance};
pub use model::{Candidate, IndexedIssue, IssueRecord, distance_from_cosine_score};

pub const DEFAULT_COLLECTION_NAME: &str = "issues";

pub const DEFAULT_VECTOR_SIZE: u64 = crate::constants::DEFAULT_VECTOR_SIZE_U64;

/// Payload key holding the repository scope of a point.
pub const REPO_PAYLOAD_KEY: &str = "repo";
