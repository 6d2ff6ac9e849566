//! Progress notification port
//!
//! Defines the interface for reporting progress while a plan is built.

use planner_domain::{LoopState, TriageConsensus};

/// Callback for progress updates during planning
///
/// Implementations live with the caller and can display progress however they
/// like. Every method has a no-op default.
pub trait PlanningProgress: Send + Sync {
    /// Called when the loop enters a new state within a round
    fn on_state(&self, _round: usize, _state: LoopState) {}

    /// Called when one generation or judgment call finishes
    fn on_item_complete(&self, _round: usize, _state: LoopState, _success: bool) {}

    /// Called after a round was aggregated
    fn on_round_complete(&self, _round: usize, _margin: f64) {}

    /// Called when the triage gate has decided
    fn on_triage_complete(&self, _consensus: &TriageConsensus) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl PlanningProgress for NoProgress {}
