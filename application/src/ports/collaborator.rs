//! External collaborator ports
//!
//! Candidate generation, pairwise judging, rubric scoring, refinement and
//! triage voting are all delegated to language-model backed adapters. The
//! planner only sees the narrow contracts defined here.

use async_trait::async_trait;
use planner_domain::{Candidate, FinalPlan, Side, TokenUsage, TriagePerspective, TriageVote};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by an external collaborator call
///
/// Every variant is treated as a per-item failure by the orchestration code:
/// the item is dropped from its batch, logged and not retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Task aborted: {0}")]
    Aborted(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// A collaborator result together with the tokens it consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct Metered<T> {
    pub value: T,
    pub usage: Option<TokenUsage>,
}

impl<T> Metered<T> {
    /// A result that reports no usage (mocks, cached answers).
    pub fn free(value: T) -> Self {
        Self { value, usage: None }
    }

    pub fn with_usage(value: T, usage: TokenUsage) -> Self {
        Self {
            value,
            usage: Some(usage),
        }
    }
}

/// A planning request as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Free-text description of the work to plan
    pub description: String,
    /// Opaque caller context forwarded to collaborators untouched
    #[serde(default)]
    pub context: serde_json::Value,
}

impl TaskRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            context: serde_json::Value::Null,
        }
    }

    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = context;
        self
    }
}

/// What the generator sees for one candidate slot.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub task: TaskRequest,
    /// 1-based round number
    pub round: usize,
    /// Position of this slot within the round
    pub slot: usize,
    /// Best candidate of the earlier rounds, if any
    pub best_so_far: Option<Candidate>,
}

/// Outcome of a single pairwise judgment.
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeVerdict {
    pub winner: Side,
    pub confidence: f64,
    pub reasoning: String,
}

/// Per-criterion rubric scores for one candidate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RubricScore {
    pub criteria: BTreeMap<String, f64>,
    pub overall: f64,
}

/// Produces plan candidates.
///
/// Must be callable concurrently; the planner issues one call per slot.
#[async_trait]
pub trait CandidateGenerator: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
        temperature: f64,
    ) -> Result<Metered<Candidate>, CollaboratorError>;
}

/// Compares two candidates for a task.
#[async_trait]
pub trait PairwiseJudge: Send + Sync {
    async fn compare(
        &self,
        candidate_a: &Candidate,
        candidate_b: &Candidate,
        task: &str,
    ) -> Result<Metered<JudgeVerdict>, CollaboratorError>;
}

/// Scores a candidate against a fixed rubric. Not used for convergence.
#[async_trait]
pub trait RubricJudge: Send + Sync {
    async fn score(
        &self,
        candidate: &Candidate,
        task: &str,
    ) -> Result<Metered<RubricScore>, CollaboratorError>;
}

/// Turns the winning candidates into a final plan (one call per session).
#[async_trait]
pub trait Refiner: Send + Sync {
    async fn refine(
        &self,
        top_candidates: &[Candidate],
        request: &TaskRequest,
    ) -> Result<Metered<FinalPlan>, CollaboratorError>;
}

/// Casts one triage vote from a fixed perspective.
#[async_trait]
pub trait TriageJudge: Send + Sync {
    async fn vote(
        &self,
        request: &TaskRequest,
        perspective: TriagePerspective,
        temperature: f64,
    ) -> Result<Metered<TriageVote>, CollaboratorError>;
}
