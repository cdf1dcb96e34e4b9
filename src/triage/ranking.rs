use super::types::{RankedResult, ScoredCandidate};

/// Runner-up candidates shown after the best match.
pub const MAX_ALTERNATES: usize = 2;

/// Order candidates by combined score, best first.
///
/// The sort is stable: equal scores keep the order the engine produced them
/// in, which is knowledge-base order.
pub fn rank(mut candidates: Vec<ScoredCandidate>) -> RankedResult {
    candidates.sort_by(|a, b| {
        b.combined_score()
            .partial_cmp(&a.combined_score())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    RankedResult {
        ordered: candidates,
    }
}
