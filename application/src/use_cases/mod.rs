//! Use cases (application services)
//!
//! - [`run_triage`]: proceed/escalate decision from three perspectives
//! - [`run_planning`]: multi-round generate, judge, aggregate loop
//! - [`plan_task`]: triage first, planner only when escalated

pub mod fan_out;
pub mod pair_selection;
pub mod plan_task;
pub mod run_planning;
pub mod run_triage;
