//! Domain layer for swarm-planner
//!
//! This crate contains the core decision logic of the planner: rank
//! aggregation, judge reliability, the triage gate, plan validation gates and
//! cost accounting. It has no dependencies on infrastructure, async runtimes
//! or model providers.
//!
//! # Core Concepts
//!
//! ## Consensus
//!
//! Candidates are never scored in isolation. Judges compare them two at a
//! time and the [`ConsensusEngine`] turns the pile of pairwise preferences
//! into a ranking:
//!
//! - **BTL**: Bradley-Terry-Luce skills fit by minorization-maximization
//! - **RankCentrality**: stationary distribution of a comparison random walk
//! - **Schulze**: Condorcet-consistent ordering via strongest paths
//!
//! The gap between the two best scores (the *top margin*) decides whether the
//! planner has converged.
//!
//! ## Triage
//!
//! Before any expensive planning, three perspectives vote on whether a
//! request needs the full multi-round treatment ([`TriageConsensus`]).

pub mod budget;
pub mod consensus;
pub mod core;
pub mod orchestration;
pub mod plan;
pub mod ranking;
pub mod reliability;
pub mod triage;

// Re-export commonly used types
pub use budget::{CostSummary, CostTracker, ModelPricing, TokenUsage, pricing_for};
pub use consensus::{ConsensusEngine, DEFAULT_CONVERGENCE_THRESHOLD, should_converge};
pub use core::{
    candidate::{Candidate, PairwiseComparison, RawComparison, Side},
    error::DomainError,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use orchestration::{Degradation, LoopState, PlanResponse, RoundState, Termination};
pub use plan::{FinalPlan, GateAdjustment, PlanPhase};
pub use ranking::{
    Aggregate, ConsensusMethod, Pairwise, RankAggregator, RankingResult, bradley_terry,
    rank_centrality, schulze_method,
};
pub use reliability::{JudgeReliability, Judgment};
pub use triage::{
    DecisionVotes, EscalationRule, TriageConsensus, TriageDecision, TriagePerspective, TriageVote,
};
