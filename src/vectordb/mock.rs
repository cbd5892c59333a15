use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::vectordb::{
    Candidate, IndexedIssue, IssueIndex, IssueRecord, RetrievalError, VectorRepository,
};

const MOCK_COLLECTION: &str = "mock_issues";

/// In-memory issue store with exact cosine search. Clones share the same data.
#[derive(Clone, Default)]
pub struct MockIssueStore {
    inner: Arc<MockInner>,
}

#[derive(Default)]
struct MockInner {
    points: RwLock<HashMap<u64, IndexedIssue>>,
    vector_size: Option<usize>,
    fail_searches: AtomicBool,
    unhealthy: AtomicBool,
}

impl MockIssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects upserts whose vectors are not `vector_size` long.
    pub fn with_vector_size(vector_size: usize) -> Self {
        Self {
            inner: Arc::new(MockInner {
                vector_size: Some(vector_size),
                ..Default::default()
            }),
        }
    }

    pub fn issue_count(&self) -> usize {
        self.inner.points.read().len()
    }

    /// Makes every subsequent search fail with [`RetrievalError::SearchFailed`].
    pub fn set_fail_searches(&self, fail: bool) {
        self.inner.fail_searches.store(fail, Ordering::SeqCst);
    }

    /// Makes [`IssueIndex::health_check`] fail.
    pub fn set_unhealthy(&self, unhealthy: bool) {
        self.inner.unhealthy.store(unhealthy, Ordering::SeqCst);
    }
}

impl VectorRepository for MockIssueStore {
    async fn search_by_vector(
        &self,
        scope: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<Candidate>, RetrievalError> {
        if self.inner.fail_searches.load(Ordering::SeqCst) {
            return Err(RetrievalError::SearchFailed {
                collection: MOCK_COLLECTION.to_string(),
                message: "injected failure".to_string(),
            });
        }

        let points = self.inner.points.read();
        let mut results: Vec<Candidate> = points
            .values()
            .filter(|p| p.record.repo == scope)
            .map(|p| Candidate {
                id: p.record.id.clone(),
                scope: p.record.repo.clone(),
                title: p.record.title.clone(),
                body: p.record.body.clone(),
                distance: cosine_distance(vector, &p.vector),
            })
            .collect();

        results.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        results.truncate(limit);
        Ok(results)
    }
}

impl IssueIndex for MockIssueStore {
    async fn ensure_collection(&self) -> Result<(), RetrievalError> {
        Ok(())
    }

    async fn upsert_issues(&self, issues: Vec<IndexedIssue>) -> Result<(), RetrievalError> {
        if let Some(expected) = self.inner.vector_size
            && let Some(bad) = issues.iter().find(|i| i.vector.len() != expected)
        {
            return Err(RetrievalError::InvalidDimension {
                expected,
                actual: bad.vector.len(),
            });
        }

        let mut points = self.inner.points.write();
        for issue in issues {
            points.insert(issue.point_id(), issue);
        }

        Ok(())
    }

    async fn list_issues(&self, repo: &str) -> Result<Vec<IssueRecord>, RetrievalError> {
        let points = self.inner.points.read();
        let mut issues: Vec<IssueRecord> = points
            .values()
            .filter(|p| p.record.repo == repo)
            .map(|p| p.record.clone())
            .collect();

        issues.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(issues)
    }

    async fn health_check(&self) -> Result<(), RetrievalError> {
        if self.inner.unhealthy.load(Ordering::SeqCst) {
            return Err(RetrievalError::ConnectionFailed {
                url: "mock://issues".to_string(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Cosine distance (`1 - cosine similarity`); `1.0` for empty or mismatched inputs.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 1.0;
    }

    let dot_product: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum();
    let norm_a: f64 = a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        1.0
    } else {
        1.0 - dot_product / (norm_a * norm_b)
    }
}
