use crate::budget::CostSummary;
use crate::core::candidate::Candidate;
use crate::plan::{FinalPlan, GateAdjustment};
use crate::ranking::RankingResult;
use serde::{Deserialize, Serialize};

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Converged,
    MaxRounds,
    Deadline,
    CostBudget,
    /// The caller cancelled the session between rounds.
    Cancelled,
    /// A later round produced nothing; the best earlier result is kept.
    NoCandidates,
    /// No comparisons came back; first-candidate fallback.
    NoComparisons,
    Failed,
}

/// Best-effort conditions that lowered the reported confidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    /// Judging returned nothing, so the first candidate was taken.
    NoComparisons,
    /// Refinement failed; the best raw candidate is returned.
    RefinementFailed(String),
}

/// Final output of a planning session.
///
/// A failed plan always carries `error`; a degraded plan is still
/// `success = true` but with a confidence reflecting the degradation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResponse {
    pub success: bool,
    pub candidate: Option<Candidate>,
    pub plan: Option<FinalPlan>,
    pub confidence: f64,
    pub margin: f64,
    pub rounds_completed: usize,
    pub termination: Termination,
    #[serde(default)]
    pub degradations: Vec<Degradation>,
    #[serde(default)]
    pub gate_adjustments: Vec<GateAdjustment>,
    pub ranking: Option<RankingResult>,
    /// Overall rubric score of the returned candidate, when scored
    pub rubric_score: Option<f64>,
    pub cost: CostSummary,
    pub error: Option<String>,
}

impl PlanResponse {
    /// A failed plan with a human-readable reason.
    pub fn failure(error: impl Into<String>, rounds_completed: usize, cost: CostSummary) -> Self {
        Self {
            success: false,
            candidate: None,
            plan: None,
            confidence: 0.0,
            margin: 0.0,
            rounds_completed,
            termination: Termination::Failed,
            degradations: Vec::new(),
            gate_adjustments: Vec::new(),
            ranking: None,
            rubric_score: None,
            cost,
            error: Some(error.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}
