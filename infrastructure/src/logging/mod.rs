//! Logging infrastructure
//!
//! - [`init_tracing`]: installs the `tracing` subscriber from a [`LoggingConfig`]
//! - [`JsonlPlanningLogger`]: JSONL writer implementing the
//!   [`PlanningEventLogger`](planner_application::PlanningEventLogger) port

mod jsonl_logger;
mod subscriber;

pub use jsonl_logger::JsonlPlanningLogger;
pub use subscriber::{LoggingConfig, LoggingError, init_tracing};
