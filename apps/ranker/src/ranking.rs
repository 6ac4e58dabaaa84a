//! Ranker: Orders scored candidates. Pure and deterministic.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::models::{CandidateProfile, RankedResult, ScoreBreakdown};

/// A fully scored candidate waiting for its rank.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub profile: Arc<CandidateProfile>,
    pub breakdown: ScoreBreakdown,
    pub final_score: f64,
    pub notes: Vec<String>,
}

/// Descending final score, ties by ascending candidate id. Ranks are 1-based.
pub fn rank(mut scored: Vec<ScoredCandidate>) -> Vec<RankedResult> {
    scored.sort_by(compare);
    scored
        .into_iter()
        .enumerate()
        .map(|(i, c)| RankedResult {
            rank: i + 1,
            profile: c.profile,
            breakdown: c.breakdown,
            final_score: c.final_score,
            notes: c.notes,
        })
        .collect()
}

fn compare(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.final_score
        .total_cmp(&a.final_score)
        .then_with(|| a.profile.id.cmp(&b.profile.id))
}
