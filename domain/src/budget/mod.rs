//! Token, latency and cost accounting.
//!
//! [`CostTracker`] accumulates [`TokenUsage`] reported by collaborators and
//! prices it with [`pricing_for`]. The orchestration loop consults
//! [`CostTracker::should_stop`] once per round so it stops before the budget
//! is exceeded rather than after.

mod pricing;
mod tracker;

pub use pricing::{DEFAULT_PRICING, ModelPricing, pricing_for};
pub use tracker::{BUDGET_STOP_FRACTION, CostSummary, CostTracker, TokenUsage};
