//! Issue Radar HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use radar::config::Config;
use radar::embedding::{EmbeddingBackend, HttpEmbedder, StubEmbedder};
use radar::gateway::{HandlerState, create_router_with_state};
use radar::vectordb::{IssueIndex, QdrantIssueStore};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check().await);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        qdrant_url = %config.qdrant_url,
        collection = %config.collection,
        "Issue Radar starting"
    );

    let embedder = match config.http_embedder_config() {
        Some(http_config) => {
            tracing::info!(url = %http_config.base_url, "Using HTTP embedding worker");
            EmbeddingBackend::Http(HttpEmbedder::new(http_config)?)
        }
        None => {
            tracing::warn!("No RADAR_EMBEDDER_URL configured, running embedder in stub mode");
            EmbeddingBackend::Stub(StubEmbedder::new(config.embedding_dim))
        }
    };
    let embedder_mode = embedder.mode();

    let store = QdrantIssueStore::new(
        &config.qdrant_url,
        &config.collection,
        config.embedding_dim as u64,
    )?;
    store.ensure_collection().await?;

    let state = HandlerState::new(
        Arc::new(embedder),
        store,
        config.search_config()?,
        config.issues_path.clone(),
        embedder_mode,
    );

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Issue Radar shutdown complete");
    Ok(())
}

async fn run_health_check() -> i32 {
    let port = std::env::var("RADAR_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()
    {
        Ok(client) => client,
        Err(_) => return 1,
    };

    match client.get(&url).send().await {
        Ok(res) if res.status().is_success() => 0,
        _ => 1,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
