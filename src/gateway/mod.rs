//! HTTP gateway (Axum) for issue search and ingestion.
//!
//! This module is primarily used by the `radar` server binary.

#![allow(missing_docs)]

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::warn;

pub use handler::{ingest_handler, issues_handler, register_repo_handler, search_handler};
pub use state::HandlerState;

use crate::embedding::Embedder;
use crate::vectordb::{IssueIndex, VectorRepository};

/// Response header carrying the request outcome.
pub const RADAR_STATUS_HEADER: &str = "x-radar-status";
pub const RADAR_STATUS_MATCH: &str = "match";
pub const RADAR_STATUS_NO_MATCH: &str = "no_match";
pub const RADAR_STATUS_OK: &str = "ok";
pub const RADAR_STATUS_HEALTHY: &str = "healthy";
pub const RADAR_STATUS_READY: &str = "ready";
pub const RADAR_STATUS_PENDING: &str = "pending";

pub fn create_router_with_state<E, R>(state: HandlerState<E, R>) -> Router
where
    E: Embedder + 'static,
    R: VectorRepository + IssueIndex + Clone + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/ready", get(ready_handler::<E, R>))
        .route("/search", get(search_handler::<E, R>))
        .route("/issues", get(issues_handler::<E, R>))
        .route("/repos", post(register_repo_handler))
        .route("/repos/{repo}/ingest", post(ingest_handler::<E, R>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub vectordb: &'static str,
    pub embedding: &'static str,
    pub embedder_mode: &'static str,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        RADAR_STATUS_HEADER,
        HeaderValue::from_static(RADAR_STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<E, R>(State(state): State<HandlerState<E, R>>) -> Response
where
    E: Embedder + 'static,
    R: VectorRepository + IssueIndex + Clone + 'static,
{
    let vectordb_status = match state.store.health_check().await {
        Ok(()) => RADAR_STATUS_READY,
        Err(e) => {
            warn!(error = %e, "Vector store not ready");
            RADAR_STATUS_PENDING
        }
    };

    let components = ComponentStatus {
        http: RADAR_STATUS_READY,
        vectordb: vectordb_status,
        embedding: RADAR_STATUS_READY,
        embedder_mode: state.embedder_mode,
    };

    let is_ready = components.vectordb == RADAR_STATUS_READY;

    let status_code = if is_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let status_msg = if is_ready { "ok" } else { RADAR_STATUS_PENDING };

    let mut headers = HeaderMap::new();
    headers.insert(RADAR_STATUS_HEADER, HeaderValue::from_static(status_msg));

    (
        status_code,
        headers,
        Json(ReadyResponse {
            status: status_msg,
            components,
        }),
    )
        .into_response()
}
