//! Port for structured planning event logging.
//!
//! Defines the [`PlanningEventLogger`] trait for recording what a planning
//! session did (rounds, candidates, comparisons, aggregation results, triage
//! outcome) to a machine-readable log.
//!
//! This is separate from `tracing`-based operation logs: tracing handles
//! human-readable diagnostics, while this port captures the decision trail in
//! a form that can be replayed or audited (JSONL).

use serde_json::Value;

/// A structured planning event.
pub struct PlanningEvent {
    /// Event type identifier (e.g., "round_started", "round_aggregated").
    pub event_type: &'static str,
    /// JSON payload with event-specific data.
    pub payload: Value,
}

impl PlanningEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Port for logging planning events.
///
/// `log` is synchronous and infallible; write failures are swallowed by the
/// adapter so they never disturb a planning session.
pub trait PlanningEventLogger: Send + Sync {
    fn log(&self, event: PlanningEvent);
}

/// No-op implementation for tests and when event logging is disabled.
pub struct NoPlanningLogger;

impl PlanningEventLogger for NoPlanningLogger {
    fn log(&self, _event: PlanningEvent) {}
}
