use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, CreateFieldIndexCollectionBuilder, Distance, FieldType,
    Filter, PointStruct, ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder,
    VectorParamsBuilder,
};
use tracing::debug;

use super::REPO_PAYLOAD_KEY;
use super::error::RetrievalError;
use super::model::{Candidate, IndexedIssue, IssueRecord};

const SCROLL_PAGE_SIZE: u32 = 256;

#[derive(Clone)]
/// Qdrant-backed issue store. One collection holds every repository; searches filter on `repo`.
pub struct QdrantIssueStore {
    client: Qdrant,
    url: String,
    collection: String,
    vector_size: u64,
}

impl std::fmt::Debug for QdrantIssueStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QdrantIssueStore")
            .field("url", &self.url)
            .field("collection", &self.collection)
            .field("vector_size", &self.vector_size)
            .finish()
    }
}

impl QdrantIssueStore {
    /// Creates a store for `url`. No request is made until first use.
    pub fn new(url: &str, collection: &str, vector_size: u64) -> Result<Self, RetrievalError> {
        let client =
            Qdrant::from_url(url)
                .build()
                .map_err(|e| RetrievalError::ConnectionFailed {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;

        Ok(Self {
            client,
            url: url.to_string(),
            collection: collection.to_string(),
            vector_size,
        })
    }

    /// Returns the configured URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the collection name.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn repo_filter(repo: &str) -> Filter {
        Filter::must([Condition::matches(REPO_PAYLOAD_KEY, repo.to_string())])
    }

    fn collection_error(&self, e: impl std::fmt::Display) -> RetrievalError {
        RetrievalError::CollectionFailed {
            collection: self.collection.clone(),
            message: e.to_string(),
        }
    }

    async fn create_collection(&self) -> Result<(), RetrievalError> {
        let vectors_config = VectorParamsBuilder::new(self.vector_size, Distance::Cosine);

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection)
                    .vectors_config(vectors_config)
                    .on_disk_payload(true),
            )
            .await
            .map_err(|e| self.collection_error(e))?;

        self.client
            .create_field_index(CreateFieldIndexCollectionBuilder::new(
                &self.collection,
                REPO_PAYLOAD_KEY,
                FieldType::Keyword,
            ))
            .await
            .map_err(|e| self.collection_error(e))?;

        Ok(())
    }
}

/// Nearest-neighbor read path consumed by the search pipeline.
pub trait VectorRepository: Send + Sync {
    /// Returns up to `limit` candidates of `scope`, ordered by ascending distance.
    fn search_by_vector(
        &self,
        scope: &str,
        vector: &[f32],
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<Candidate>, RetrievalError>> + Send;
}

/// Write/admin side of the issue store.
pub trait IssueIndex: Send + Sync {
    /// Ensures the backing collection exists.
    fn ensure_collection(
        &self,
    ) -> impl std::future::Future<Output = Result<(), RetrievalError>> + Send;

    /// Inserts or replaces issues (keyed by repo and issue id).
    fn upsert_issues(
        &self,
        issues: Vec<IndexedIssue>,
    ) -> impl std::future::Future<Output = Result<(), RetrievalError>> + Send;

    /// Lists every stored issue of `repo`, oldest first.
    fn list_issues(
        &self,
        repo: &str,
    ) -> impl std::future::Future<Output = Result<Vec<IssueRecord>, RetrievalError>> + Send;

    /// Performs a basic liveness request against the backend.
    fn health_check(&self) -> impl std::future::Future<Output = Result<(), RetrievalError>> + Send;
}

impl VectorRepository for QdrantIssueStore {
    async fn search_by_vector(
        &self,
        scope: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<Candidate>, RetrievalError> {
        let search = SearchPointsBuilder::new(&self.collection, vector.to_vec(), limit as u64)
            .filter(Self::repo_filter(scope))
            .with_payload(true);

        let started = std::time::Instant::now();
        let response =
            self.client
                .search_points(search)
                .await
                .map_err(|e| RetrievalError::SearchFailed {
                    collection: self.collection.clone(),
                    message: e.to_string(),
                })?;

        // Qdrant returns hits by descending score, which is ascending cosine distance.
        let candidates: Vec<Candidate> = response
            .result
            .into_iter()
            .filter_map(Candidate::from_scored_point)
            .collect();

        debug!(
            scope,
            limit,
            hits = candidates.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Vector search complete"
        );

        Ok(candidates)
    }
}

impl IssueIndex for QdrantIssueStore {
    async fn ensure_collection(&self) -> Result<(), RetrievalError> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| self.collection_error(e))?;

        if !exists {
            self.create_collection().await?;
        }

        Ok(())
    }

    async fn upsert_issues(&self, issues: Vec<IndexedIssue>) -> Result<(), RetrievalError> {
        if issues.is_empty() {
            return Ok(());
        }

        let mut points = Vec::with_capacity(issues.len());
        for issue in issues {
            if issue.vector.len() as u64 != self.vector_size {
                return Err(RetrievalError::InvalidDimension {
                    expected: self.vector_size as usize,
                    actual: issue.vector.len(),
                });
            }
            let id = issue.point_id();
            points.push(PointStruct::new(id, issue.vector, issue.record.to_payload()));
        }

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(|e| RetrievalError::UpsertFailed {
                collection: self.collection.clone(),
                message: e.to_string(),
            })?;

        Ok(())
    }

    async fn list_issues(&self, repo: &str) -> Result<Vec<IssueRecord>, RetrievalError> {
        let mut issues = Vec::new();
        let mut offset = None;

        loop {
            let mut scroll = ScrollPointsBuilder::new(&self.collection)
                .filter(Self::repo_filter(repo))
                .limit(SCROLL_PAGE_SIZE)
                .with_payload(true)
                .with_vectors(false);
            if let Some(point_id) = offset.take() {
                scroll = scroll.offset(point_id);
            }

            let page =
                self.client
                    .scroll(scroll)
                    .await
                    .map_err(|e| RetrievalError::ScrollFailed {
                        collection: self.collection.clone(),
                        message: e.to_string(),
                    })?;

            issues.extend(
                page.result
                    .into_iter()
                    .filter_map(IssueRecord::from_retrieved_point),
            );

            match page.next_page_offset {
                Some(next) => offset = Some(next),
                None => break,
            }
        }

        issues.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(issues)
    }

    async fn health_check(&self) -> Result<(), RetrievalError> {
        self.client
            .health_check()
            .await
            .map_err(|e| RetrievalError::ConnectionFailed {
                url: self.url.clone(),
                message: e.to_string(),
            })?;
        Ok(())
    }
}
