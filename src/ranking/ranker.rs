use tracing::debug;

use super::types::{Confidence, RankedIssue, Thresholds};
use crate::vectordb::Candidate;

/// `similarity = DISTANCE_TO_SIMILARITY_OFFSET - distance`.
///
/// Cosine distance lives in `[0, 2]`, so similarity lands in `[-1, 1]`, the same scale the
/// thresholds are expressed on.
pub const DISTANCE_TO_SIMILARITY_OFFSET: f64 = 1.0;

/// Maps a cosine distance to a cosine similarity. Strictly decreasing in `distance`.
#[inline]
pub fn similarity_from_distance(distance: f64) -> f64 {
    DISTANCE_TO_SIMILARITY_OFFSET - distance
}

/// Scores, tiers, and truncates distance-ordered candidates.
///
/// Output is every Strong result followed by every Weak result, each group in input order,
/// cut to at most `limit` entries. Candidates below the weak threshold are dropped.
pub fn score_and_rank(
    candidates: Vec<Candidate>,
    limit: usize,
    thresholds: Thresholds,
) -> Vec<RankedIssue> {
    let mut strong = Vec::with_capacity(candidates.len());
    let mut weak = Vec::new();

    for candidate in candidates {
        let similarity = similarity_from_distance(candidate.distance);

        match thresholds.classify(similarity) {
            Some(Confidence::Strong) => strong.push(RankedIssue::from_candidate(
                candidate,
                similarity,
                Confidence::Strong,
            )),
            Some(Confidence::Weak) => weak.push(RankedIssue::from_candidate(
                candidate,
                similarity,
                Confidence::Weak,
            )),
            None => {
                debug!(
                    id = %candidate.id,
                    title = %candidate.title,
                    distance = candidate.distance,
                    similarity,
                    strong = thresholds.strong(),
                    weak = thresholds.weak(),
                    "Candidate below weak threshold, filtered out"
                );
            }
        }
    }

    if strong.len() >= limit {
        strong.truncate(limit);
        return strong;
    }

    let remaining = limit - strong.len();
    strong.extend(weak.into_iter().take(remaining));
    strong
}
