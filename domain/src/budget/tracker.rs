use super::pricing::pricing_for;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fraction of the budget at which the planner stops starting new rounds.
pub const BUDGET_STOP_FRACTION: f64 = 0.95;

/// Usage reported by one external call.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Prompt tokens served from cache (billed at the cached rate)
    pub cached_tokens: u64,
    pub latency: Duration,
}

impl TokenUsage {
    pub fn new(model: impl Into<String>, input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            model: model.into(),
            input_tokens,
            output_tokens,
            ..Default::default()
        }
    }

    pub fn with_cached(mut self, cached_tokens: u64) -> Self {
        self.cached_tokens = cached_tokens;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Estimated cost in USD.
    pub fn cost(&self) -> f64 {
        pricing_for(&self.model).calculate_cost(
            self.input_tokens,
            self.output_tokens,
            self.cached_tokens,
        )
    }
}

/// Snapshot of a tracker's totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CostSummary {
    pub calls: u64,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cached_tokens: u64,
    pub total_latency: Duration,
    pub total_cost: f64,
    pub cost_budget: f64,
}

/// Running token/latency/cost totals against a USD budget.
///
/// Pure bookkeeping; nothing is persisted. One tracker belongs to one planning
/// session.
#[derive(Debug, Clone, PartialEq)]
pub struct CostTracker {
    cost_budget: f64,
    calls: u64,
    input_tokens: u64,
    output_tokens: u64,
    cached_tokens: u64,
    total_latency: Duration,
    total_cost: f64,
}

impl CostTracker {
    pub fn new(cost_budget: f64) -> Self {
        Self {
            cost_budget: cost_budget.max(0.0),
            calls: 0,
            input_tokens: 0,
            output_tokens: 0,
            cached_tokens: 0,
            total_latency: Duration::ZERO,
            total_cost: 0.0,
        }
    }

    /// Add one call's usage.
    pub fn record(&mut self, usage: &TokenUsage) {
        self.calls += 1;
        self.input_tokens += usage.input_tokens;
        self.output_tokens += usage.output_tokens;
        self.cached_tokens += usage.cached_tokens;
        self.total_latency += usage.latency;
        self.total_cost += usage.cost();
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    pub fn cost_budget(&self) -> f64 {
        self.cost_budget
    }

    pub fn remaining(&self) -> f64 {
        (self.cost_budget - self.total_cost).max(0.0)
    }

    /// `total_cost > cost_budget`
    pub fn is_over_budget(&self) -> bool {
        self.total_cost > self.cost_budget
    }

    /// Whether spend has reached `fraction` of the budget.
    pub fn is_near_budget(&self, fraction: f64) -> bool {
        self.total_cost >= self.cost_budget * fraction
    }

    /// Stop before overspending: true at 95% of the budget.
    pub fn should_stop(&self) -> bool {
        self.is_near_budget(BUDGET_STOP_FRACTION)
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.cost_budget);
    }

    pub fn summary(&self) -> CostSummary {
        CostSummary {
            calls: self.calls,
            input_tokens: self.input_tokens,
            output_tokens: self.output_tokens,
            cached_tokens: self.cached_tokens,
            total_latency: self.total_latency,
            total_cost: self.total_cost,
            cost_budget: self.cost_budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_usage() {
        let mut tracker = CostTracker::new(1.0);
        tracker.record(
            &TokenUsage::new("claude-sonnet-4.5", 10_000, 2_000)
                .with_cached(5_000)
                .with_latency(Duration::from_millis(800)),
        );
        tracker.record(&TokenUsage::new("gpt-4o-mini", 1_000, 1_000));

        let summary = tracker.summary();
        assert_eq!(summary.calls, 2);
        assert_eq!(summary.input_tokens, 11_000);
        assert_eq!(summary.cached_tokens, 5_000);
        assert_eq!(summary.total_latency, Duration::from_millis(800));
        // sonnet: 0.03 + 0.03 + 0.0015; mini: 0.00015 + 0.0006
        assert!((summary.total_cost - 0.06225).abs() < 1e-9);
    }

    #[test]
    fn test_budget_thresholds() {
        let mut tracker = CostTracker::new(0.10);
        // $0.096 on sonnet output tokens
        tracker.record(&TokenUsage::new("sonnet", 0, 6_400));
        assert!(tracker.should_stop());
        assert!(!tracker.is_over_budget());

        tracker.record(&TokenUsage::new("sonnet", 0, 1_000));
        assert!(tracker.is_over_budget());
        assert_eq!(tracker.remaining(), 0.0);
    }

    #[test]
    fn test_reset_keeps_budget() {
        let mut tracker = CostTracker::new(2.0);
        tracker.record(&TokenUsage::new("opus", 1_000, 1_000));
        tracker.reset();
        assert_eq!(tracker.total_cost(), 0.0);
        assert_eq!(tracker.cost_budget(), 2.0);
        assert_eq!(tracker.summary().calls, 0);
    }
}
