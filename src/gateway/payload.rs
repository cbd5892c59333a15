use serde::{Deserialize, Serialize};

use crate::ranking::RankedIssue;
use crate::search::SearchOutcome;

/// Raw `/search` query string. Fields are kept as strings so validation owns the messages.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub repo: Option<String>,
    pub q: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IssuesParams {
    pub repo: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IngestParams {
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRepoRequest {
    pub repo: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisterRepoResponse {
    pub status: String,
    pub repo: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<RankedIssue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub strong_sim_thr: f64,
    pub weak_sim_thr: f64,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            message: outcome.message().map(str::to_string),
            strong_sim_thr: outcome.thresholds.strong(),
            weak_sim_thr: outcome.thresholds.weak(),
            results: outcome.results,
        }
    }
}
