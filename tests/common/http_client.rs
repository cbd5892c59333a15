//! HTTP client helpers for tests.

use radar::IngestReport;
use radar::gateway::payload::SearchResponse;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {0}: {1}")]
    UnexpectedStatus(u16, String),
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ReadyComponents {
    pub http: String,
    pub vectordb: String,
    pub embedder_mode: String,
}

#[derive(Debug, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub components: ReadyComponents,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    async fn expect_success<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<(T, String), TestClientError> {
        let status_header = resp
            .headers()
            .get("x-radar-status")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        if resp.status().is_success() {
            Ok((resp.json().await?, status_header))
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let resp = self.client.get(self.url("/healthz")).send().await?;
        Ok(Self::expect_success(resp).await?.0)
    }

    pub async fn ready(&self) -> Result<ReadyResponse, TestClientError> {
        let resp = self.client.get(self.url("/ready")).send().await?;
        Ok(Self::expect_success(resp).await?.0)
    }

    pub async fn ingest(&self, repo: &str) -> Result<IngestReport, TestClientError> {
        let resp = self
            .client
            .post(self.url(&format!("/repos/{}/ingest", repo.replace('/', "%2F"))))
            .query(&[("mode", "mock")])
            .send()
            .await?;
        Ok(Self::expect_success(resp).await?.0)
    }

    /// Returns the decoded body and the `x-radar-status` header.
    pub async fn search(
        &self,
        repo: &str,
        query: &str,
        limit: Option<&str>,
    ) -> Result<(SearchResponse, String), TestClientError> {
        let mut params = vec![("repo", repo), ("q", query)];
        if let Some(limit) = limit {
            params.push(("limit", limit));
        }

        let resp = self
            .client
            .get(self.url("/search"))
            .query(&params)
            .send()
            .await?;
        Self::expect_success(resp).await
    }

    pub async fn issues(&self, repo: &str) -> Result<Vec<serde_json::Value>, TestClientError> {
        let resp = self
            .client
            .get(self.url("/issues"))
            .query(&[("repo", repo)])
            .send()
            .await?;
        Ok(Self::expect_success(resp).await?.0)
    }

    pub async fn raw_get(&self, path: &str) -> Result<reqwest::Response, TestClientError> {
        Ok(self.client.get(self.url(path)).send().await?)
    }
}
