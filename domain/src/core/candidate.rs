//! Candidate plans produced by the external generator.

use serde::{Deserialize, Serialize};

/// An opaque unit of comparison.
///
/// The planner only relies on `id` being unique within a round. The payload
/// (phases, roles, free text) belongs to the generator and is never inspected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Candidate {
    pub fn new(id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            payload,
        }
    }

    /// Candidate without payload, mostly useful in tests.
    pub fn bare(id: impl Into<String>) -> Self {
        Self::new(id, serde_json::Value::Null)
    }
}

/// Which side of a pairwise comparison won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

/// A single judged comparison between two candidates of the same round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseComparison {
    pub candidate_a_id: String,
    pub candidate_b_id: String,
    pub winner_id: String,
    pub judge_id: usize,
    /// Clamped to `[0, 1]`
    pub confidence: f64,
    pub reasoning: String,
}

impl PairwiseComparison {
    pub fn new(
        a: &Candidate,
        b: &Candidate,
        winner: Side,
        judge_id: usize,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        let winner_id = match winner {
            Side::A => a.id.clone(),
            Side::B => b.id.clone(),
        };
        Self {
            candidate_a_id: a.id.clone(),
            candidate_b_id: b.id.clone(),
            winner_id,
            judge_id,
            confidence: clamp_unit(confidence),
            reasoning: reasoning.into(),
        }
    }

    /// Id of the losing candidate.
    pub fn loser_id(&self) -> &str {
        if self.winner_id == self.candidate_a_id {
            &self.candidate_b_id
        } else {
            &self.candidate_a_id
        }
    }
}

/// Index-based `(winner, loser, judge)` triple consumed by the consensus engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawComparison {
    pub winner: usize,
    pub loser: usize,
    pub judge_id: usize,
}

impl RawComparison {
    pub fn new(winner: usize, loser: usize, judge_id: usize) -> Self {
        Self {
            winner,
            loser,
            judge_id,
        }
    }

    /// Resolve a judged comparison against the round's ordered candidate ids.
    ///
    /// Returns `None` when either id is not part of the round.
    pub fn from_comparison(comparison: &PairwiseComparison, ids: &[String]) -> Option<Self> {
        let index_of = |id: &str| ids.iter().position(|c| c == id);
        let winner = index_of(&comparison.winner_id)?;
        let loser = index_of(comparison.loser_id())?;
        Some(Self::new(winner, loser, comparison.judge_id))
    }
}

/// Clamp a value into `[0, 1]`, mapping NaN to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
