use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, info, instrument};

use super::{RADAR_STATUS_HEADER, RADAR_STATUS_MATCH, RADAR_STATUS_NO_MATCH, RADAR_STATUS_OK};
use crate::constants::{DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT};
use crate::embedding::Embedder;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    IngestParams, IssuesParams, RegisterRepoRequest, RegisterRepoResponse, SearchParams,
    SearchResponse,
};
use crate::gateway::state::HandlerState;
use crate::vectordb::{IssueIndex, VectorRepository};

/// Only ingestion source supported today.
pub const INGEST_MODE_MOCK: &str = "mock";

/// Parses `limit`: absent or non-integer falls back to the default, any integer is
/// clamped into `1..=MAX_SEARCH_LIMIT`, including ones too large to parse.
pub fn resolve_limit(raw: Option<&str>) -> usize {
    let Some(raw) = raw.map(str::trim) else {
        return DEFAULT_SEARCH_LIMIT;
    };

    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return DEFAULT_SEARCH_LIMIT;
    }
    if negative {
        return 1;
    }

    digits
        .parse::<usize>()
        .map_or(MAX_SEARCH_LIMIT, |n| n.clamp(1, MAX_SEARCH_LIMIT))
}

/// Returns the trimmed value, or an `InvalidRequest` naming the parameter.
pub fn require_param(name: &str, value: Option<String>) -> Result<String, GatewayError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| GatewayError::InvalidRequest(format!("{} is required", name)))
}

fn status_headers(status: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(RADAR_STATUS_HEADER, HeaderValue::from_static(status));
    headers
}

#[instrument(skip(state, params), fields(repo = tracing::field::Empty, limit = tracing::field::Empty))]
pub async fn search_handler<E, R>(
    State(state): State<HandlerState<E, R>>,
    Query(params): Query<SearchParams>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    R: VectorRepository + IssueIndex + Clone + 'static,
{
    let repo = require_param("repo", params.repo)?;
    let query = require_param("q", params.q)?;
    let limit = resolve_limit(params.limit.as_deref());

    let span = tracing::Span::current();
    span.record("repo", tracing::field::display(&repo));
    span.record("limit", limit);

    let outcome = state.search.search(&repo, &query, limit).await?;

    let radar_status = if outcome.is_empty() {
        RADAR_STATUS_NO_MATCH
    } else {
        RADAR_STATUS_MATCH
    };
    debug!(results = outcome.results.len(), status = radar_status, "Search served");

    Ok((
        StatusCode::OK,
        status_headers(radar_status),
        Json(SearchResponse::from(outcome)),
    )
        .into_response())
}

#[instrument(skip(state, params))]
pub async fn issues_handler<E, R>(
    State(state): State<HandlerState<E, R>>,
    Query(params): Query<IssuesParams>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    R: VectorRepository + IssueIndex + Clone + 'static,
{
    let repo = require_param("repo", params.repo)?;

    let issues = state.store.list_issues(&repo).await?;
    debug!(repo = %repo, count = issues.len(), "Issues listed");

    Ok((StatusCode::OK, status_headers(RADAR_STATUS_OK), Json(issues)).into_response())
}

#[instrument(skip(state, params))]
pub async fn ingest_handler<E, R>(
    State(state): State<HandlerState<E, R>>,
    Path(repo): Path<String>,
    Query(params): Query<IngestParams>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    R: VectorRepository + IssueIndex + Clone + 'static,
{
    let repo = require_param("repo", Some(repo))?;

    if params.mode.as_deref().map(str::trim) != Some(INGEST_MODE_MOCK) {
        return Err(GatewayError::InvalidRequest(
            "only mode=mock is supported".to_string(),
        ));
    }

    let report = state.ingestor.ingest(&repo).await?;
    info!(repo = %report.repo, ingested = report.ingested, "Repository ingested");

    Ok((StatusCode::OK, status_headers(RADAR_STATUS_OK), Json(report)).into_response())
}

#[instrument(skip(body))]
pub async fn register_repo_handler(
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(request) = body.map_err(|rejection| {
        GatewayError::InvalidRequest(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    let request: RegisterRepoRequest = serde_json::from_value(request)
        .map_err(|e| GatewayError::InvalidRequest(format!("Invalid request schema: {}", e)))?;
    let repo = require_param("repo", Some(request.repo))?;

    debug!(repo = %repo, "Repository registration accepted");

    Ok((
        StatusCode::OK,
        status_headers(RADAR_STATUS_OK),
        Json(RegisterRepoResponse {
            status: "ok".to_string(),
            repo,
        }),
    )
        .into_response())
}
