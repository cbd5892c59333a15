use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use super::error::IngestError;
use crate::embedding::Embedder;
use crate::vectordb::{IndexedIssue, IssueIndex, IssueRecord};

/// Summary of one ingest run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub repo: String,
    /// Issues embedded and written to the index.
    pub ingested: usize,
    /// Issues in the source that were not written (other repositories, or no text to embed).
    pub skipped: usize,
}

/// Reads the issue source file.
pub async fn load_issues(path: &Path) -> Result<Vec<IssueRecord>, IngestError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| IngestError::Source {
            path: path.to_path_buf(),
            source,
        })?;

    serde_json::from_slice(&bytes).map_err(|source| IngestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Embeds and indexes issues from a JSON source file.
pub struct Ingestor<E, I> {
    embedder: Arc<E>,
    index: I,
    source: PathBuf,
}

impl<E, I> Ingestor<E, I>
where
    E: Embedder,
    I: IssueIndex,
{
    pub fn new(embedder: Arc<E>, index: I, source: impl Into<PathBuf>) -> Self {
        Self {
            embedder,
            index,
            source: source.into(),
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Indexes every issue in the source whose `repo` equals `repo`.
    ///
    /// Embedding is sequential and all points are written in one upsert, so a failure
    /// leaves the index untouched.
    #[instrument(skip(self), fields(source = %self.source.display()))]
    pub async fn ingest(&self, repo: &str) -> Result<IngestReport, IngestError> {
        let started = Instant::now();
        let issues = load_issues(&self.source).await?;
        let total = issues.len();

        let mut batch = Vec::new();
        for issue in issues.into_iter().filter(|issue| issue.repo == repo) {
            let text = issue.embedding_text();
            if text.trim().is_empty() {
                warn!(issue_id = %issue.id, "Skipping issue with no title or body");
                continue;
            }

            let vector = self
                .embedder
                .embed(&text)
                .await
                .inspect_err(|e| {
                    error!(issue_id = %issue.id, error = %e, "Ingest embedding failed");
                })?;
            debug!(issue_id = %issue.id, "Issue embedded");
            batch.push(IndexedIssue::new(issue, vector));
        }

        let ingested = batch.len();
        if !batch.is_empty() {
            self.index
                .upsert_issues(batch)
                .await
                .inspect_err(|e| error!(error = %e, "Ingest upsert failed"))?;
        }

        let report = IngestReport {
            repo: repo.to_string(),
            ingested,
            skipped: total - ingested,
        };

        info!(
            ingested = report.ingested,
            skipped = report.skipped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Ingest complete"
        );

        Ok(report)
    }
}

impl<E, I> std::fmt::Debug for Ingestor<E, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingestor")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
