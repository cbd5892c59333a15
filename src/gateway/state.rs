use std::path::PathBuf;
use std::sync::Arc;

use crate::embedding::Embedder;
use crate::ingest::Ingestor;
use crate::search::{SearchConfig, SearchService};
use crate::vectordb::{IssueIndex, VectorRepository};

/// Shared handler state. Cloning is cheap: services sit behind [`Arc`].
pub struct HandlerState<E, R> {
    pub search: Arc<SearchService<E, R>>,

    pub ingestor: Arc<Ingestor<E, R>>,

    pub store: R,

    /// `"http"` or `"stub"`, reported by `/ready`.
    pub embedder_mode: &'static str,
}

impl<E, R> HandlerState<E, R>
where
    E: Embedder + 'static,
    R: VectorRepository + IssueIndex + Clone + 'static,
{
    pub fn new(
        embedder: Arc<E>,
        store: R,
        search_config: SearchConfig,
        issues_path: impl Into<PathBuf>,
        embedder_mode: &'static str,
    ) -> Self {
        let search = Arc::new(SearchService::new(
            Arc::clone(&embedder),
            store.clone(),
            search_config,
        ));
        let ingestor = Arc::new(Ingestor::new(embedder, store.clone(), issues_path));

        Self {
            search,
            ingestor,
            store,
            embedder_mode,
        }
    }
}

impl<E, R: Clone> Clone for HandlerState<E, R> {
    fn clone(&self) -> Self {
        Self {
            search: Arc::clone(&self.search),
            ingestor: Arc::clone(&self.ingestor),
            store: self.store.clone(),
            embedder_mode: self.embedder_mode,
        }
    }
}
