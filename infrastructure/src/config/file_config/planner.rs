//! Planner configuration from TOML (`[planner]` section)

use planner_application::config::{
    MAX_TIME_BUDGET_SECONDS, MIN_TIME_BUDGET_SECONDS, PlannerParams,
};
use planner_domain::{ConfigIssue, ConfigIssueCode, ConsensusMethod};
use serde::{Deserialize, Serialize};

/// Raw planner configuration from TOML
///
/// # Example
///
/// ```toml
/// [planner]
/// max_rounds = 3
/// candidates_per_round = 8
/// judge_pairs_per_round = 24
/// convergence_threshold = 0.15
/// time_budget_seconds = 300
/// consensus_method = "btl"            # "btl", "rank_centrality", "schulze"
/// max_concurrency = 8
/// sampling_seed = 42                  # optional
/// reliability_weighting = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePlannerConfig {
    pub max_rounds: usize,
    pub candidates_per_round: usize,
    pub judge_pairs_per_round: usize,
    pub convergence_threshold: f64,
    pub time_budget_seconds: f64,
    pub consensus_method: String,
    pub max_concurrency: usize,
    pub min_temperature: f64,
    pub max_temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling_seed: Option<u64>,
    pub reliability_weighting: bool,
}

impl Default for FilePlannerConfig {
    fn default() -> Self {
        let params = PlannerParams::default();
        Self {
            max_rounds: params.max_rounds,
            candidates_per_round: params.candidates_per_round,
            judge_pairs_per_round: params.judge_pairs_per_round,
            convergence_threshold: params.convergence_threshold,
            time_budget_seconds: params.time_budget_seconds,
            consensus_method: params.consensus_method.as_str().to_string(),
            max_concurrency: params.max_concurrency,
            min_temperature: params.min_temperature,
            max_temperature: params.max_temperature,
            sampling_seed: params.sampling_seed,
            reliability_weighting: params.reliability_weighting,
        }
    }
}

impl FilePlannerConfig {
    /// Parse consensus_method into ConsensusMethod, warning on unknown values.
    ///
    /// Accepts: "btl", "bradley_terry", "rank_centrality", "rank-centrality", "schulze"
    pub fn parse_consensus_method(&self) -> (ConsensusMethod, Vec<ConfigIssue>) {
        match self.consensus_method.parse::<ConsensusMethod>() {
            Ok(method) => (method, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "planner.consensus_method".to_string(),
                        value: self.consensus_method.clone(),
                        valid_values: ConsensusMethod::ALL
                            .iter()
                            .map(|m| m.as_str().to_string())
                            .collect(),
                    },
                    format!(
                        "planner.consensus_method: unknown value '{}', falling back to 'btl'",
                        self.consensus_method
                    ),
                );
                (ConsensusMethod::default(), vec![issue])
            }
        }
    }

    /// Convert to [`PlannerParams`], clamping what can be clamped.
    ///
    /// Zero rounds or zero candidates per round are errors.
    pub fn to_params(&self) -> (PlannerParams, Vec<ConfigIssue>) {
        let (consensus_method, mut issues) = self.parse_consensus_method();

        for (field, value) in [
            ("planner.max_rounds", self.max_rounds),
            ("planner.candidates_per_round", self.candidates_per_round),
        ] {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroValue {
                        field: field.to_string(),
                    },
                    format!("{}: must be at least 1", field),
                ));
            }
        }

        let mut max_concurrency = self.max_concurrency;
        if max_concurrency == 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroValue {
                    field: "planner.max_concurrency".to_string(),
                },
                "planner.max_concurrency: 0 is not allowed, using 1",
            ));
            max_concurrency = 1;
        }

        let mut convergence_threshold = self.convergence_threshold;
        if !(0.0..=1.0).contains(&convergence_threshold) {
            convergence_threshold = if convergence_threshold.is_nan() {
                PlannerParams::default().convergence_threshold
            } else {
                convergence_threshold.clamp(0.0, 1.0)
            };
            issues.push(out_of_range(
                "planner.convergence_threshold",
                format!(
                    "planner.convergence_threshold: {} is outside [0, 1], using {}",
                    self.convergence_threshold, convergence_threshold
                ),
            ));
        }

        if !(MIN_TIME_BUDGET_SECONDS..=MAX_TIME_BUDGET_SECONDS).contains(&self.time_budget_seconds)
        {
            issues.push(out_of_range(
                "planner.time_budget_seconds",
                format!(
                    "planner.time_budget_seconds: {} is outside [{}, {}] and will be clamped",
                    self.time_budget_seconds, MIN_TIME_BUDGET_SECONDS, MAX_TIME_BUDGET_SECONDS
                ),
            ));
        }

        if self.min_temperature > self.max_temperature {
            issues.push(out_of_range(
                "planner.min_temperature",
                format!(
                    "planner.min_temperature ({}) is above max_temperature ({}), the range is swapped",
                    self.min_temperature, self.max_temperature
                ),
            ));
        }

        let params = PlannerParams {
            max_rounds: self.max_rounds,
            candidates_per_round: self.candidates_per_round,
            judge_pairs_per_round: self.judge_pairs_per_round,
            convergence_threshold,
            time_budget_seconds: self.time_budget_seconds,
            consensus_method,
            max_concurrency,
            min_temperature: self.min_temperature,
            max_temperature: self.max_temperature,
            sampling_seed: self.sampling_seed,
            reliability_weighting: self.reliability_weighting,
        };
        (params, issues)
    }
}

fn out_of_range(field: &str, message: String) -> ConfigIssue {
    ConfigIssue::warning(
        ConfigIssueCode::OutOfRange {
            field: field.to_string(),
        },
        message,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_domain::Severity;

    #[test]
    fn test_planner_config_deserialize() {
        let toml_str = r#"
max_rounds = 5
consensus_method = "schulze"
sampling_seed = 42
"#;
        let config: FilePlannerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.max_rounds, 5);
        assert_eq!(config.candidates_per_round, 8);
        assert_eq!(config.sampling_seed, Some(42));

        let (params, issues) = config.to_params();
        assert!(issues.is_empty());
        assert_eq!(params.consensus_method, ConsensusMethod::Schulze);
        assert_eq!(params.sampling_seed, Some(42));
    }

    #[test]
    fn test_defaults_match_params() {
        let (params, issues) = FilePlannerConfig::default().to_params();
        assert!(issues.is_empty());
        assert_eq!(params, PlannerParams::default());
    }

    #[test]
    fn test_unknown_method_falls_back() {
        let config = FilePlannerConfig {
            consensus_method: "elo".to_string(),
            ..Default::default()
        };
        let (method, issues) = config.parse_consensus_method();
        assert_eq!(method, ConsensusMethod::Btl);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Warning);
        match &issues[0].code {
            ConfigIssueCode::InvalidEnumValue {
                field,
                valid_values,
                ..
            } => {
                assert_eq!(field, "planner.consensus_method");
                assert_eq!(valid_values.len(), 3);
            }
            other => panic!("unexpected issue code: {:?}", other),
        }
    }

    #[test]
    fn test_zero_rounds_is_error() {
        let config = FilePlannerConfig {
            max_rounds: 0,
            ..Default::default()
        };
        let (_, issues) = config.to_params();
        assert!(ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn test_out_of_range_values_warn() {
        let config = FilePlannerConfig {
            convergence_threshold: 2.5,
            time_budget_seconds: 86_400.0,
            max_concurrency: 0,
            ..Default::default()
        };
        let (params, issues) = config.to_params();
        assert_eq!(issues.len(), 3);
        assert!(!ConfigIssue::has_errors(&issues));
        assert!((params.convergence_threshold - 1.0).abs() < 1e-12);
        assert_eq!(params.max_concurrency, 1);
        assert_eq!(params.time_budget().as_secs(), 3600);
    }
}
