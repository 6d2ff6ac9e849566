//! Planner parameters: multi-round loop control.
//!
//! [`PlannerParams`] groups the static parameters that drive
//! [`RunPlanningUseCase`](crate::use_cases::run_planning::RunPlanningUseCase).
//! These are application-layer concerns, not domain policy.

use planner_domain::{ConsensusMethod, DEFAULT_CONVERGENCE_THRESHOLD};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Lower bound of the wall-clock budget in seconds.
pub const MIN_TIME_BUDGET_SECONDS: f64 = 1.0;
/// Hard ceiling of the wall-clock budget in seconds.
pub const MAX_TIME_BUDGET_SECONDS: f64 = 3600.0;

/// Multi-round loop control parameters.
///
/// | Field | Default |
/// |-------|---------|
/// | `max_rounds` | 3 |
/// | `candidates_per_round` | 8 |
/// | `judge_pairs_per_round` | 24 |
/// | `convergence_threshold` | 0.15 |
/// | `time_budget_seconds` | 300 |
/// | `consensus_method` | BTL |
/// | `max_concurrency` | 8 |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerParams {
    pub max_rounds: usize,
    pub candidates_per_round: usize,
    /// Upper bound on judged pairs per round; larger pair sets are sampled.
    pub judge_pairs_per_round: usize,
    pub convergence_threshold: f64,
    /// Wall-clock budget, clamped by [`PlannerParams::time_budget`].
    pub time_budget_seconds: f64,
    pub consensus_method: ConsensusMethod,
    /// Maximum concurrent collaborator calls within one fan-out.
    pub max_concurrency: usize,
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// Fixed seed for pair sampling (reproducible runs).
    pub sampling_seed: Option<u64>,
    /// Weight comparisons by estimated judge accuracy.
    pub reliability_weighting: bool,
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            candidates_per_round: 8,
            judge_pairs_per_round: 24,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            time_budget_seconds: 300.0,
            consensus_method: ConsensusMethod::Btl,
            max_concurrency: 8,
            min_temperature: 0.2,
            max_temperature: 1.0,
            sampling_seed: None,
            reliability_weighting: false,
        }
    }
}

impl PlannerParams {
    /// Wall-clock budget clamped to `[1s, 3600s]`.
    pub fn time_budget(&self) -> Duration {
        let seconds = if self.time_budget_seconds.is_nan() {
            MIN_TIME_BUDGET_SECONDS
        } else {
            self.time_budget_seconds
                .clamp(MIN_TIME_BUDGET_SECONDS, MAX_TIME_BUDGET_SECONDS)
        };
        Duration::from_secs_f64(seconds)
    }

    /// Sampling temperatures for `count` generation slots, spread linearly
    /// from `min_temperature` to `max_temperature`.
    pub fn temperatures(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.min_temperature <= self.max_temperature {
            (self.min_temperature, self.max_temperature)
        } else {
            (self.max_temperature, self.min_temperature)
        };
        match count {
            0 => Vec::new(),
            1 => vec![lo],
            _ => (0..count)
                .map(|i| lo + (hi - lo) * i as f64 / (count - 1) as f64)
                .collect(),
        }
    }

    /// Fan-out limit, never zero.
    pub fn concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }

    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn with_candidates_per_round(mut self, count: usize) -> Self {
        self.candidates_per_round = count;
        self
    }

    pub fn with_judge_pairs_per_round(mut self, pairs: usize) -> Self {
        self.judge_pairs_per_round = pairs;
        self
    }

    pub fn with_convergence_threshold(mut self, threshold: f64) -> Self {
        self.convergence_threshold = threshold;
        self
    }

    pub fn with_time_budget_seconds(mut self, seconds: f64) -> Self {
        self.time_budget_seconds = seconds;
        self
    }

    pub fn with_consensus_method(mut self, method: ConsensusMethod) -> Self {
        self.consensus_method = method;
        self
    }

    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit;
        self
    }

    pub fn with_temperature_range(mut self, min: f64, max: f64) -> Self {
        self.min_temperature = min;
        self.max_temperature = max;
        self
    }

    pub fn with_sampling_seed(mut self, seed: u64) -> Self {
        self.sampling_seed = Some(seed);
        self
    }

    pub fn with_reliability_weighting(mut self, enabled: bool) -> Self {
        self.reliability_weighting = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = PlannerParams::default();
        assert_eq!(params.max_rounds, 3);
        assert_eq!(params.candidates_per_round, 8);
        assert_eq!(params.judge_pairs_per_round, 24);
        assert!((params.convergence_threshold - 0.15).abs() < 1e-12);
        assert_eq!(params.consensus_method, ConsensusMethod::Btl);
        assert_eq!(params.time_budget(), Duration::from_secs(300));
        assert!(params.sampling_seed.is_none());
        assert!(!params.reliability_weighting);
    }

    #[test]
    fn test_time_budget_clamped() {
        let huge = PlannerParams::default().with_time_budget_seconds(1e9);
        assert_eq!(huge.time_budget(), Duration::from_secs(3600));

        let tiny = PlannerParams::default().with_time_budget_seconds(0.0);
        assert_eq!(tiny.time_budget(), Duration::from_secs(1));

        let nan = PlannerParams::default().with_time_budget_seconds(f64::NAN);
        assert_eq!(nan.time_budget(), Duration::from_secs(1));
    }

    #[test]
    fn test_temperatures_spread() {
        let params = PlannerParams::default().with_temperature_range(0.2, 1.0);
        let temps = params.temperatures(5);
        assert_eq!(temps.len(), 5);
        assert!((temps[0] - 0.2).abs() < 1e-12);
        assert!((temps[2] - 0.6).abs() < 1e-12);
        assert!((temps[4] - 1.0).abs() < 1e-12);

        assert_eq!(params.temperatures(1), vec![0.2]);
        assert!(params.temperatures(0).is_empty());
    }

    #[test]
    fn test_builder() {
        let params = PlannerParams::default()
            .with_max_rounds(5)
            .with_consensus_method(ConsensusMethod::Schulze)
            .with_max_concurrency(0)
            .with_sampling_seed(7);

        assert_eq!(params.max_rounds, 5);
        assert_eq!(params.consensus_method, ConsensusMethod::Schulze);
        assert_eq!(params.concurrency(), 1);
        assert_eq!(params.sampling_seed, Some(7));
    }
}
