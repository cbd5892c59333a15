//! Test server harness.

use radar::embedding::StubEmbedder;
use radar::gateway::{HandlerState, create_router_with_state};
use radar::search::SearchConfig;
use radar::vectordb::MockIssueStore;
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

pub const TEST_EMBEDDING_DIM: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct TestServerConfig {
    /// Issue file served to mock ingestion. `None` writes [`default_issues_json`].
    pub issues_path: Option<PathBuf>,
    pub search_config: SearchConfig,
}

pub struct TestServer {
    pub addr: SocketAddr,
    pub store: MockIssueStore,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _issues_file: Option<NamedTempFile>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

/// Issues for two repositories, one of which is the default test repo.
pub fn default_issues_json() -> &'static str {
    r#"[
  {"id": "1", "repo": "acme/widgets", "title": "Widget rendering is slow on large pages",
   "body": "Rendering 500 widgets takes several seconds.", "labels": ["performance"],
   "created_at": "2024-07-01T10:00:00Z", "updated_at": "2024-07-01T10:00:00Z"},
  {"id": "2", "repo": "acme/widgets", "title": "Crash when widget config is empty",
   "body": "Passing an empty config object panics.", "labels": ["bug"],
   "created_at": "2024-07-02T10:00:00Z", "updated_at": "2024-07-02T10:00:00Z"},
  {"id": "3", "repo": "acme/widgets", "title": "Add dark theme",
   "body": "", "labels": ["enhancement"],
   "created_at": "2024-07-03T10:00:00Z", "updated_at": "2024-07-03T10:00:00Z"},
  {"id": "9", "repo": "acme/gadgets", "title": "Crash when widget config is empty",
   "body": "Passing an empty config object panics.", "labels": ["bug"],
   "created_at": "2024-07-01T09:00:00Z", "updated_at": "2024-07-01T09:00:00Z"}
]"#
}

/// Spawns a server with the stub embedder and the in-memory store.
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;

    let (issues_path, issues_file) = match config.issues_path {
        Some(path) => (path, None),
        None => {
            let mut file = NamedTempFile::new()?;
            file.write_all(default_issues_json().as_bytes())?;
            (file.path().to_path_buf(), Some(file))
        }
    };

    let store = MockIssueStore::with_vector_size(TEST_EMBEDDING_DIM);
    let state = HandlerState::new(
        Arc::new(StubEmbedder::new(TEST_EMBEDDING_DIM)),
        store.clone(),
        config.search_config,
        issues_path,
        "stub",
    );
    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let server_handle = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    Ok(TestServer {
        addr,
        store,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
        _issues_file: issues_file,
    })
}
