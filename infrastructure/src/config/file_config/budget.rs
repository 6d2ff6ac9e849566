//! Budget configuration from TOML (`[budget]` section)

use planner_application::config::BudgetParams;
use planner_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw budget configuration from TOML
///
/// ```toml
/// [budget]
/// cost_budget_usd = 5.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBudgetConfig {
    pub cost_budget_usd: f64,
}

impl Default for FileBudgetConfig {
    fn default() -> Self {
        Self {
            cost_budget_usd: BudgetParams::default().cost_budget_usd,
        }
    }
}

impl FileBudgetConfig {
    /// A budget that is not a positive number is an error.
    pub fn to_params(&self) -> (BudgetParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        if self.cost_budget_usd.is_nan() || self.cost_budget_usd <= 0.0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "budget.cost_budget_usd".to_string(),
                },
                format!(
                    "budget.cost_budget_usd: must be positive, got {}",
                    self.cost_budget_usd
                ),
            ));
        }
        (
            BudgetParams {
                cost_budget_usd: self.cost_budget_usd,
            },
            issues,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_validation() {
        let (params, issues) = FileBudgetConfig::default().to_params();
        assert!(issues.is_empty());
        assert!((params.cost_budget_usd - 5.0).abs() < 1e-12);

        let zero = FileBudgetConfig {
            cost_budget_usd: 0.0,
        };
        assert!(ConfigIssue::has_errors(&zero.to_params().1));

        let nan = FileBudgetConfig {
            cost_budget_usd: f64::NAN,
        };
        assert!(ConfigIssue::has_errors(&nan.to_params().1));
    }
}
