use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, timeout_at};
use tracing::{Span, debug, error, field, info, instrument};
use uuid::Uuid;

use super::error::SearchError;
use crate::constants::{DEFAULT_SEARCH_TIMEOUT, MAX_SEARCH_LIMIT, NO_MATCH_MESSAGE};
use crate::embedding::{Embedder, EmbeddingError};
use crate::ranking::{RankedIssue, Thresholds, score_and_rank};
use crate::vectordb::{RetrievalError, VectorRepository};

/// Per-process search settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub thresholds: Thresholds,
    /// Deadline covering embedding and retrieval together.
    pub timeout: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }
}

impl SearchConfig {
    pub fn new(thresholds: Thresholds, timeout: Duration) -> Self {
        Self {
            thresholds,
            timeout,
        }
    }
}

/// Successful search result. An empty result list is a normal outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub results: Vec<RankedIssue>,
    pub thresholds: Thresholds,
}

impl SearchOutcome {
    /// Human-readable note, present exactly when no issue cleared the weak threshold.
    pub fn message(&self) -> Option<&'static str> {
        self.results.is_empty().then_some(NO_MATCH_MESSAGE)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn strong_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_strong()).count()
    }
}

/// Runs the embed, retrieve, rank pipeline for one request at a time.
///
/// Immutable after construction; share it across requests behind an [`Arc`].
pub struct SearchService<E, R> {
    embedder: Arc<E>,
    repository: R,
    config: SearchConfig,
}

impl<E, R> SearchService<E, R>
where
    E: Embedder,
    R: VectorRepository,
{
    pub fn new(embedder: Arc<E>, repository: R, config: SearchConfig) -> Self {
        Self {
            embedder,
            repository,
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn thresholds(&self) -> Thresholds {
        self.config.thresholds
    }

    pub fn embedder(&self) -> &Arc<E> {
        &self.embedder
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Searches `scope` for issues similar to `query`.
    ///
    /// The caller validates inputs: `scope` and `query` non-empty, `limit` in `1..=20`.
    /// A `limit` of 0 returns an empty outcome without calling either collaborator.
    #[instrument(
        skip(self, query),
        fields(request_id = field::Empty, query_len = query.len())
    )]
    pub async fn search(
        &self,
        scope: &str,
        query: &str,
        limit: usize,
    ) -> Result<SearchOutcome, SearchError> {
        Span::current().record("request_id", field::display(Uuid::new_v4()));

        let thresholds = self.config.thresholds;
        if limit == 0 {
            debug!("Zero limit requested, skipping pipeline");
            return Ok(SearchOutcome {
                results: Vec::new(),
                thresholds,
            });
        }

        let started = Instant::now();
        let deadline = started + self.config.timeout;
        let timeout = self.config.timeout;

        let vector = timeout_at(deadline, self.embedder.embed(query))
            .await
            .map_err(|_| EmbeddingError::Timeout { timeout })
            .and_then(|result| result)
            .inspect_err(|e| error!(error = %e, stage = "embedding", "Search failed"))?;
        let embedded_at = Instant::now();

        let fetch = limit.min(MAX_SEARCH_LIMIT);
        let candidates = timeout_at(
            deadline,
            self.repository.search_by_vector(scope, &vector, fetch),
        )
        .await
        .map_err(|_| RetrievalError::Timeout { timeout })
        .and_then(|result| result)
        .inspect_err(|e| error!(error = %e, stage = "retrieval", "Search failed"))?;
        let retrieved_at = Instant::now();

        let candidate_count = candidates.len();
        let results = score_and_rank(candidates, limit, thresholds);
        let outcome = SearchOutcome {
            results,
            thresholds,
        };

        info!(
            candidates = candidate_count,
            results = outcome.results.len(),
            strong = outcome.strong_count(),
            embed_ms = (embedded_at - started).as_millis() as u64,
            retrieve_ms = (retrieved_at - embedded_at).as_millis() as u64,
            total_ms = started.elapsed().as_millis() as u64,
            "Search complete"
        );

        Ok(outcome)
    }
}

impl<E, R> std::fmt::Debug for SearchService<E, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
