use crate::core::candidate::{Candidate, PairwiseComparison};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Phase of the orchestration loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    Generating,
    Judging,
    Aggregating,
    /// Margin cleared the threshold
    Converged,
    /// Another round will run
    Continue,
    /// Rounds, time or cost ran out
    Exhausted,
    /// No candidates were produced
    Failed,
}

impl LoopState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LoopState::Converged | LoopState::Exhausted | LoopState::Failed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoopState::Generating => "generating",
            LoopState::Judging => "judging",
            LoopState::Aggregating => "aggregating",
            LoopState::Converged => "converged",
            LoopState::Continue => "continue",
            LoopState::Exhausted => "exhausted",
            LoopState::Failed => "failed",
        }
    }
}

impl std::fmt::Display for LoopState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable state of one planning session's loop.
///
/// Only the `best_*` fields outlive the loop.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub round_number: usize,
    pub state: LoopState,
    pub candidates: Vec<Candidate>,
    pub comparisons: Vec<PairwiseComparison>,
    pub best_candidate: Option<Candidate>,
    pub best_margin: f64,
    pub best_confidence: f64,
    pub elapsed: Duration,
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            round_number: 0,
            state: LoopState::Generating,
            candidates: Vec::new(),
            comparisons: Vec::new(),
            best_candidate: None,
            best_margin: 0.0,
            best_confidence: 0.0,
            elapsed: Duration::ZERO,
        }
    }

    /// Start a new round, clearing the per-round collections.
    pub fn begin_round(&mut self) {
        self.round_number += 1;
        self.state = LoopState::Generating;
        self.candidates.clear();
        self.comparisons.clear();
    }

    /// Record a round winner if it beats the best margin so far.
    ///
    /// The first winner is always recorded. Returns whether it was taken, so
    /// `best_margin` never decreases.
    pub fn offer_best(&mut self, candidate: &Candidate, margin: f64, confidence: f64) -> bool {
        if self.best_candidate.is_none() || margin > self.best_margin {
            self.best_candidate = Some(candidate.clone());
            self.best_margin = margin;
            self.best_confidence = confidence;
            true
        } else {
            false
        }
    }

    /// Overwrite the best with a degraded fallback (no comparisons available).
    ///
    /// Keeps an earlier aggregated winner if there is one.
    pub fn fallback_best(&mut self, candidate: &Candidate, confidence: f64) {
        if self.best_candidate.is_none() {
            self.best_candidate = Some(candidate.clone());
            self.best_margin = 0.0;
            self.best_confidence = confidence;
        }
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(LoopState::Converged.is_terminal());
        assert!(LoopState::Exhausted.is_terminal());
        assert!(LoopState::Failed.is_terminal());
        assert!(!LoopState::Continue.is_terminal());
        assert!(!LoopState::Judging.is_terminal());
    }

    #[test]
    fn test_best_margin_never_decreases() {
        let mut state = RoundState::new();
        let margins = [0.05, 0.12, 0.03, 0.12, 0.4, 0.2];
        let mut last = f64::NEG_INFINITY;
        for (i, margin) in margins.iter().enumerate() {
            state.begin_round();
            state.offer_best(&Candidate::bare(format!("c{i}")), *margin, 0.5);
            assert!(state.best_margin >= last);
            last = state.best_margin;
        }
        assert_eq!(state.best_candidate.unwrap().id, "c4");
        assert_eq!(state.round_number, 6);
    }

    #[test]
    fn test_first_winner_always_recorded() {
        let mut state = RoundState::new();
        assert!(state.offer_best(&Candidate::bare("tie"), 0.0, 0.5));
        assert!(!state.offer_best(&Candidate::bare("other"), 0.0, 0.9));
        assert_eq!(state.best_candidate.unwrap().id, "tie");
    }

    #[test]
    fn test_fallback_does_not_replace_winner() {
        let mut state = RoundState::new();
        state.offer_best(&Candidate::bare("winner"), 0.3, 0.9);
        state.fallback_best(&Candidate::bare("first"), 0.5);
        assert_eq!(state.best_candidate.unwrap().id, "winner");
    }
}
