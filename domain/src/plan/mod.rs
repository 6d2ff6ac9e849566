//! Final plans and the local hard validation gates applied to them.

mod entities;
mod gates;

pub use entities::{FinalPlan, PlanPhase};
pub use gates::{GateAdjustment, MAX_PHASES, MIN_PHASES};
