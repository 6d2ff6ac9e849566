//! Normalized ranking output.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Ranking of one round's candidates.
///
/// For BTL and RankCentrality `scores` sum to 1. For Schulze they are the
/// rank proxy `(n - position) / n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RankingResult {
    /// Candidate ids, best first.
    pub ranked_ids: Vec<String>,
    pub scores: HashMap<String, f64>,
    /// `score[rank 0] - score[rank 1]`, 0 with fewer than two candidates
    /// (1.0 for the single-candidate short-circuit).
    pub top_margin: f64,
}

impl RankingResult {
    /// Result for a lone candidate: score 1, margin 1.
    pub fn singleton(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            scores: HashMap::from([(id.clone(), 1.0)]),
            ranked_ids: vec![id],
            top_margin: 1.0,
        }
    }

    /// Winning candidate id, if any.
    pub fn top(&self) -> Option<&str> {
        self.ranked_ids.first().map(String::as_str)
    }

    /// Score of the winning candidate (0 when empty).
    pub fn top_score(&self) -> f64 {
        self.top()
            .and_then(|id| self.scores.get(id))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn score_of(&self, id: &str) -> Option<f64> {
        self.scores.get(id).copied()
    }
}
