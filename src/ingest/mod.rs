//! Bulk issue ingestion from a static JSON file.
//!
//! The file holds a JSON array of [`IssueRecord`](crate::vectordb::IssueRecord)s, possibly
//! spanning several repositories. [`Ingestor::ingest`] indexes the issues of one repository:
//! each is embedded from its title and body, then upserted keyed on `(repo, id)`, so running
//! an ingest twice leaves the index unchanged.

mod error;
mod ingestor;


pub use error::IngestError;
pub use ingestor::{IngestReport, Ingestor, load_issues};
