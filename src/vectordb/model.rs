use std::collections::HashMap;

use chrono::{DateTime, Utc};
use qdrant_client::qdrant::value::Kind;
use qdrant_client::qdrant::{ListValue, RetrievedPoint, ScoredPoint, Value};
use serde::{Deserialize, Serialize};

use super::REPO_PAYLOAD_KEY;

const ISSUE_ID_KEY: &str = "issue_id";
const TITLE_KEY: &str = "title";
const BODY_KEY: &str = "body";
const LABELS_KEY: &str = "labels";
const CREATED_AT_KEY: &str = "created_at";
const UPDATED_AT_KEY: &str = "updated_at";

/// A retrieval-stage record with an unclassified distance.
///
/// `distance` is a cosine distance: smaller means more similar.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub scope: String,
    pub title: String,
    pub body: String,
    pub distance: f64,
}

impl Candidate {
    pub fn new(
        id: impl Into<String>,
        scope: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        distance: f64,
    ) -> Self {
        Self {
            id: id.into(),
            scope: scope.into(),
            title: title.into(),
            body: body.into(),
            distance,
        }
    }

    /// Builds a candidate from a Qdrant hit. Points without an `issue_id` payload are skipped.
    pub fn from_scored_point(point: ScoredPoint) -> Option<Self> {
        let payload = point.payload;

        let id = payload_string(&payload, ISSUE_ID_KEY)?;
        let scope = payload_string(&payload, REPO_PAYLOAD_KEY)?;

        Some(Self {
            id,
            scope,
            title: payload_string(&payload, TITLE_KEY).unwrap_or_default(),
            body: payload_string(&payload, BODY_KEY).unwrap_or_default(),
            distance: distance_from_cosine_score(point.score),
        })
    }
}

/// Converts a Qdrant cosine score (a similarity) to a cosine distance.
#[inline]
pub fn distance_from_cosine_score(score: f32) -> f64 {
    1.0 - f64::from(score)
}

/// An issue as ingested and listed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub id: String,
    pub repo: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: String,
}

impl IssueRecord {
    /// Text fed to the embedder: title and body separated by a blank line.
    pub fn embedding_text(&self) -> String {
        if self.body.trim().is_empty() {
            self.title.clone()
        } else {
            format!("{}\n\n{}", self.title, self.body)
        }
    }

    pub fn to_payload(&self) -> HashMap<String, Value> {
        let mut payload: HashMap<String, Value> = HashMap::new();
        payload.insert(ISSUE_ID_KEY.to_string(), self.id.clone().into());
        payload.insert(REPO_PAYLOAD_KEY.to_string(), self.repo.clone().into());
        payload.insert(TITLE_KEY.to_string(), self.title.clone().into());
        payload.insert(BODY_KEY.to_string(), self.body.clone().into());
        payload.insert(
            LABELS_KEY.to_string(),
            Value {
                kind: Some(Kind::ListValue(ListValue {
                    values: self.labels.iter().cloned().map(Value::from).collect(),
                })),
            },
        );
        payload.insert(
            CREATED_AT_KEY.to_string(),
            self.created_at.to_rfc3339().into(),
        );
        payload.insert(UPDATED_AT_KEY.to_string(), self.updated_at.clone().into());
        payload
    }

    pub fn from_payload(payload: &HashMap<String, Value>) -> Option<Self> {
        let id = payload_string(payload, ISSUE_ID_KEY)?;
        let repo = payload_string(payload, REPO_PAYLOAD_KEY)?;

        let labels = match payload.get(LABELS_KEY).and_then(|v| v.kind.as_ref()) {
            Some(Kind::ListValue(list)) => list
                .values
                .iter()
                .filter_map(|v| match &v.kind {
                    Some(Kind::StringValue(s)) => Some(s.clone()),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        let created_at = payload_string(payload, CREATED_AT_KEY)
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default();

        Some(Self {
            id,
            repo,
            title: payload_string(payload, TITLE_KEY).unwrap_or_default(),
            body: payload_string(payload, BODY_KEY).unwrap_or_default(),
            labels,
            created_at,
            updated_at: payload_string(payload, UPDATED_AT_KEY).unwrap_or_default(),
        })
    }

    pub fn from_retrieved_point(point: RetrievedPoint) -> Option<Self> {
        Self::from_payload(&point.payload)
    }
}

/// An issue paired with its embedding, ready to upsert.
#[derive(Debug, Clone)]
pub struct IndexedIssue {
    pub record: IssueRecord,
    pub vector: Vec<f32>,
}

impl IndexedIssue {
    pub fn new(record: IssueRecord, vector: Vec<f32>) -> Self {
        Self { record, vector }
    }

    /// Stable point id derived from `(repo, id)`.
    pub fn point_id(&self) -> u64 {
        crate::hashing::issue_point_id(&self.record.repo, &self.record.id)
    }
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}
