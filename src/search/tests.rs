use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;

use super::*;
use crate::constants::NO_MATCH_MESSAGE;
use crate::embedding::{Embedder, EmbeddingError, StubEmbedder};
use crate::ranking::{Confidence, Thresholds};
use crate::vectordb::{
    Candidate, IndexedIssue, IssueIndex, IssueRecord, MockIssueStore, RetrievalError,
    VectorRepository,
};

const TEST_REPO: &str = "demo/reporadar";

#[derive(Default)]
struct FixedEmbedder {
    calls: AtomicUsize,
}

impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![1.0, 0.0, 0.0])
    }
}

struct SlowEmbedder {
    delay: Duration,
}

impl Embedder for SlowEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        tokio::time::sleep(self.delay).await;
        Ok(vec![1.0, 0.0, 0.0])
    }
}

struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Err(EmbeddingError::Status {
            status: 500,
            body: "worker crashed".to_string(),
        })
    }
}

/// Returns a fixed candidate list and records how it was called.
#[derive(Clone, Default)]
struct RecordingRepository {
    candidates: Vec<Candidate>,
    delay: Option<Duration>,
    fail: bool,
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<(String, usize)>>>,
}

impl RecordingRepository {
    fn with_similarities(similarities: &[(&str, f64)]) -> Self {
        Self {
            candidates: similarities
                .iter()
                .map(|(id, sim)| Candidate::new(*id, TEST_REPO, format!("issue {id}"), "", 1.0 - sim))
                .collect(),
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VectorRepository for RecordingRepository {
    async fn search_by_vector(
        &self,
        scope: &str,
        _vector: &[f32],
        limit: usize,
    ) -> Result<Vec<Candidate>, RetrievalError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some((scope.to_string(), limit));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(RetrievalError::SearchFailed {
                collection: "issues".to_string(),
                message: "connection reset".to_string(),
            });
        }

        let mut out = self.candidates.clone();
        out.truncate(limit);
        Ok(out)
    }
}

fn config(strong: f64, weak: f64) -> SearchConfig {
    SearchConfig::new(
        Thresholds::new(strong, weak).expect("valid thresholds"),
        Duration::from_secs(10),
    )
}

fn ids(outcome: &SearchOutcome) -> Vec<&str> {
    outcome.results.iter().map(|r| r.id.as_str()).collect()
}

#[tokio::test]
async fn test_search_ranks_retrieved_candidates() {
    let repo = RecordingRepository::with_similarities(&[("1", 0.8), ("2", 0.4), ("3", 0.1)]);
    let service = SearchService::new(Arc::new(FixedEmbedder::default()), repo, config(0.6, 0.3));

    let outcome = service.search(TEST_REPO, "login fails", 10).await.unwrap();

    assert_eq!(ids(&outcome), vec!["1", "2"]);
    assert_eq!(outcome.results[0].confidence, Confidence::Strong);
    assert_eq!(outcome.results[1].confidence, Confidence::Weak);
    assert_eq!(outcome.strong_count(), 1);
    assert_eq!(outcome.message(), None);
    assert_eq!(outcome.thresholds, service.thresholds());
}

#[tokio::test]
async fn test_search_passes_scope_and_limit_to_repository() {
    let repo = RecordingRepository::with_similarities(&[("1", 0.9)]);
    let service = SearchService::new(
        Arc::new(FixedEmbedder::default()),
        repo.clone(),
        SearchConfig::default(),
    );

    service.search(TEST_REPO, "q", 7).await.unwrap();

    assert_eq!(repo.calls(), 1);
    assert_eq!(
        repo.last_request.lock().clone(),
        Some((TEST_REPO.to_string(), 7))
    );
}

#[tokio::test]
async fn test_search_caps_fetch_size() {
    let repo = RecordingRepository::default();
    let service = SearchService::new(
        Arc::new(FixedEmbedder::default()),
        repo.clone(),
        SearchConfig::default(),
    );

    service.search(TEST_REPO, "q", 500).await.unwrap();

    assert_eq!(repo.last_request.lock().as_ref().map(|(_, l)| *l), Some(20));
}

#[tokio::test]
async fn test_search_empty_outcome_is_success_with_message() {
    let repo = RecordingRepository::with_similarities(&[("1", 0.2), ("2", 0.1)]);
    let service = SearchService::new(Arc::new(FixedEmbedder::default()), repo, config(0.6, 0.3));

    let outcome = service.search(TEST_REPO, "q", 10).await.unwrap();

    assert!(outcome.is_empty());
    assert_eq!(outcome.message(), Some(NO_MATCH_MESSAGE));
}

#[tokio::test]
async fn test_search_zero_limit_skips_collaborators() {
    let embedder = Arc::new(FixedEmbedder::default());
    let repo = RecordingRepository::with_similarities(&[("1", 0.9)]);
    let service = SearchService::new(embedder.clone(), repo.clone(), SearchConfig::default());

    let outcome = service.search(TEST_REPO, "q", 0).await.unwrap();

    assert!(outcome.is_empty());
    assert_eq!(embedder.calls.load(Ordering::SeqCst), 0);
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn test_search_embedding_failure_skips_retrieval() {
    let repo = RecordingRepository::with_similarities(&[("1", 0.9)]);
    let service = SearchService::new(Arc::new(FailingEmbedder), repo.clone(), SearchConfig::default());

    let err = service.search(TEST_REPO, "q", 10).await.unwrap_err();

    assert!(matches!(err, SearchError::Embedding(EmbeddingError::Status { .. })));
    assert_eq!(err.kind(), "embedding");
    assert!(!err.is_timeout());
    assert_eq!(repo.calls(), 0);
}

#[tokio::test]
async fn test_search_retrieval_failure() {
    let repo = RecordingRepository {
        fail: true,
        ..Default::default()
    };
    let service = SearchService::new(
        Arc::new(FixedEmbedder::default()),
        repo,
        SearchConfig::default(),
    );

    let err = service.search(TEST_REPO, "q", 10).await.unwrap_err();

    assert!(matches!(err, SearchError::Retrieval(RetrievalError::SearchFailed { .. })));
    assert_eq!(err.kind(), "retrieval");
}

#[tokio::test(start_paused = true)]
async fn test_search_embedding_deadline_aborts_before_retrieval() {
    let repo = RecordingRepository::with_similarities(&[("1", 0.9)]);
    let service = SearchService::new(
        Arc::new(SlowEmbedder {
            delay: Duration::from_secs(30),
        }),
        repo.clone(),
        SearchConfig::default(),
    );

    let err = service.search(TEST_REPO, "q", 10).await.unwrap_err();

    assert!(matches!(
        err,
        SearchError::Embedding(EmbeddingError::Timeout { .. })
    ));
    assert!(err.is_timeout());
    assert_eq!(repo.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_search_deadline_spans_both_stages() {
    // 6s embedding + 6s retrieval exceeds the shared 10s budget even though each stage
    // alone would fit.
    let repo = RecordingRepository {
        delay: Some(Duration::from_secs(6)),
        ..RecordingRepository::with_similarities(&[("1", 0.9)])
    };
    let service = SearchService::new(
        Arc::new(SlowEmbedder {
            delay: Duration::from_secs(6),
        }),
        repo.clone(),
        SearchConfig::default(),
    );

    let err = service.search(TEST_REPO, "q", 10).await.unwrap_err();

    assert!(matches!(
        err,
        SearchError::Retrieval(RetrievalError::Timeout { .. })
    ));
    assert_eq!(repo.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_search_within_deadline_succeeds() {
    let repo = RecordingRepository {
        delay: Some(Duration::from_secs(3)),
        ..RecordingRepository::with_similarities(&[("1", 0.9)])
    };
    let service = SearchService::new(
        Arc::new(SlowEmbedder {
            delay: Duration::from_secs(3),
        }),
        repo,
        SearchConfig::default(),
    );

    let outcome = service.search(TEST_REPO, "q", 10).await.unwrap();

    assert_eq!(ids(&outcome), vec!["1"]);
}

#[tokio::test]
async fn test_search_with_stub_embedder_and_mock_store() {
    let embedder = Arc::new(StubEmbedder::default());
    let store = MockIssueStore::with_vector_size(embedder.embedding_dim());

    let mut issues = Vec::new();
    for (id, title) in [
        ("1", "App crashes when opening settings"),
        ("2", "Add keyboard shortcut for search"),
    ] {
        let record = IssueRecord {
            id: id.to_string(),
            repo: TEST_REPO.to_string(),
            title: title.to_string(),
            body: String::new(),
            labels: Vec::new(),
            created_at: Utc::now(),
            updated_at: String::new(),
        };
        let vector = embedder.embed(&record.embedding_text()).await.unwrap();
        issues.push(IndexedIssue::new(record, vector));
    }
    store.upsert_issues(issues).await.unwrap();

    let service = SearchService::new(embedder, store, SearchConfig::default());
    let outcome = service
        .search(TEST_REPO, "App crashes when opening settings", 10)
        .await
        .unwrap();

    assert_eq!(outcome.results[0].id, "1");
    assert_eq!(outcome.results[0].confidence, Confidence::Strong);
    assert!((outcome.results[0].similarity - 1.0).abs() < 1e-4);
    assert!(outcome.results.iter().all(|r| r.scope == TEST_REPO));
}

#[tokio::test]
async fn test_search_is_idempotent() {
    let repo = RecordingRepository::with_similarities(&[
        ("a", 0.95),
        ("b", 0.55),
        ("c", 0.45),
        ("d", 0.31),
    ]);
    let service = SearchService::new(Arc::new(FixedEmbedder::default()), repo, config(0.5, 0.3));

    let first = service.search(TEST_REPO, "q", 3).await.unwrap();
    let second = service.search(TEST_REPO, "q", 3).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(ids(&first), vec!["a", "b", "c"]);
}

#[test]
fn test_search_config_default() {
    let config = SearchConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.thresholds.strong(), 0.5);
    assert_eq!(config.thresholds.weak(), 0.3);
}
