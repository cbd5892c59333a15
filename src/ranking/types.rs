use serde::{Deserialize, Serialize};

use super::error::ThresholdError;
use crate::constants::{DEFAULT_STRONG_THRESHOLD, DEFAULT_WEAK_THRESHOLD};
use crate::vectordb::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Confidence tier of a ranked issue.
pub enum Confidence {
    /// Similarity at or above the strong threshold.
    Strong,
    /// Similarity in `[weak, strong)`.
    Weak,
}

impl Confidence {
    /// Returns the wire name (`"strong"` / `"weak"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Strong => "strong",
            Confidence::Weak => "weak",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Similarity cut-offs for the two confidence tiers.
///
/// Construct through [`Thresholds::new`], which guarantees `-1 <= weak < strong <= 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    strong: f64,
    weak: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            strong: DEFAULT_STRONG_THRESHOLD,
            weak: DEFAULT_WEAK_THRESHOLD,
        }
    }
}

impl Thresholds {
    pub fn new(strong: f64, weak: f64) -> Result<Self, ThresholdError> {
        for (name, value) in [("strong", strong), ("weak", weak)] {
            if !value.is_finite() {
                return Err(ThresholdError::NotFinite { name, value });
            }
            if !(-1.0..=1.0).contains(&value) {
                return Err(ThresholdError::OutOfRange { name, value });
            }
        }

        if strong <= weak {
            return Err(ThresholdError::NotOrdered { strong, weak });
        }

        Ok(Self { strong, weak })
    }

    pub fn strong(&self) -> f64 {
        self.strong
    }

    pub fn weak(&self) -> f64 {
        self.weak
    }

    /// Tier for `similarity`, or `None` when it falls below the weak threshold.
    ///
    /// Boundary values resolve to the higher tier. NaN is never classified.
    pub fn classify(&self, similarity: f64) -> Option<Confidence> {
        if similarity >= self.strong {
            Some(Confidence::Strong)
        } else if similarity >= self.weak {
            Some(Confidence::Weak)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A candidate that survived ranking, tagged with its similarity and tier.
pub struct RankedIssue {
    pub id: String,
    #[serde(rename = "repo")]
    pub scope: String,
    pub title: String,
    pub body: String,
    pub similarity: f64,
    pub confidence: Confidence,
}

impl RankedIssue {
    pub(crate) fn from_candidate(
        candidate: Candidate,
        similarity: f64,
        confidence: Confidence,
    ) -> Self {
        Self {
            id: candidate.id,
            scope: candidate.scope,
            title: candidate.title,
            body: candidate.body,
            similarity,
            confidence,
        }
    }

    pub fn is_strong(&self) -> bool {
        self.confidence == Confidence::Strong
    }
}
