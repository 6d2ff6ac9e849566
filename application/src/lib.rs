//! Application layer for swarm-planner
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{BudgetParams, PlannerConfig, PlannerParams, TriageParams};
pub use ports::{
    collaborator::{
        CandidateGenerator, CollaboratorError, GenerationRequest, JudgeVerdict, Metered,
        PairwiseJudge, Refiner, RubricJudge, RubricScore, TaskRequest, TriageJudge,
    },
    planning_logger::{NoPlanningLogger, PlanningEvent, PlanningEventLogger},
    progress::{NoProgress, PlanningProgress},
    vocabulary::{Vocabulary, VocabularyKind},
};
pub use use_cases::fan_out::fan_out;
pub use use_cases::pair_selection::{PairSelector, UniformPairSelector};
pub use use_cases::plan_task::{PlanTaskInput, PlanTaskUseCase, TaskPlan};
pub use use_cases::run_planning::{PlanningError, RunPlanningUseCase};
pub use use_cases::run_triage::{RunTriageUseCase, TriageError};
