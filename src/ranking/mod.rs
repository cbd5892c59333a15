//! Confidence-tiered ranking of nearest-neighbor candidates.
//!
//! Candidates arrive from the [`VectorRepository`](crate::vectordb::VectorRepository) ordered
//! by ascending distance. [`score_and_rank`] converts each distance to a similarity, sorts the
//! candidates into two confidence tiers, and cuts the result to the requested page size.
//!
//! # Similarity Mapping
//!
//! Distances are cosine distances (`1 - cos(u, v)`), both from
//! [`QdrantIssueStore`](crate::vectordb::QdrantIssueStore), which converts Qdrant's cosine
//! score before returning candidates, and from the in-memory mock store. Similarity is
//! therefore recovered as `1 - distance` (see [`similarity_from_distance`]). The
//! negative-dot-product convention (`similarity = -distance`) is not supported; a backend
//! emitting it must convert first.
//!
//! # Ordering Contract
//!
//! - Strong results precede Weak results.
//! - Within a tier, results keep the order they had in the input.
//! - Truncation is a stable prefix cut, so Strong results are only dropped when Strong
//!   alone exceeds the limit.

pub mod error;
pub mod ranker;
pub mod types;


pub use error::ThresholdError;
pub use ranker::{DISTANCE_TO_SIMILARITY_OFFSET, score_and_rank, similarity_from_distance};
pub use types::{Confidence, RankedIssue, Thresholds};
