//! Search orchestration: embed the query, retrieve nearest issues, rank them.
//!
//! A search moves through `Embedding -> Retrieving -> Ranking` strictly in sequence. The
//! embedding and retrieval stages share one deadline ([`SearchConfig::timeout`]); ranking
//! runs on in-memory data and is not timed. Nothing is cached between requests.

mod error;
pub mod service;

#[cfg(test)]
mod tests;

pub use error::SearchError;
pub use service::{SearchConfig, SearchOutcome, SearchService};
