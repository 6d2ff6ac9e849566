//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`PlannerParams`]: multi-round loop control (rounds, pairs, deadline, method)
//! - [`TriageParams`]: escalation rule and vocabulary thresholds
//! - [`PlannerConfig`]: the bundle handed to the use cases

pub mod planner_config;
pub mod planner_params;
pub mod triage_params;

pub use planner_config::{BudgetParams, PlannerConfig};
pub use planner_params::{MAX_TIME_BUDGET_SECONDS, MIN_TIME_BUDGET_SECONDS, PlannerParams};
pub use triage_params::TriageParams;
