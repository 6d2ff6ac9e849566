//! Container for everything a planning session is configured with.

use super::{PlannerParams, TriageParams};
use serde::{Deserialize, Serialize};

/// Cost ceiling for one planning session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetParams {
    pub cost_budget_usd: f64,
}

impl Default for BudgetParams {
    fn default() -> Self {
        Self {
            cost_budget_usd: 5.0,
        }
    }
}

/// Planner, triage and budget parameters bundled together.
///
/// Built by the infrastructure config loader and handed to the use cases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub planner: PlannerParams,
    pub triage: TriageParams,
    pub budget: BudgetParams,
}

impl PlannerConfig {
    pub fn new(planner: PlannerParams, triage: TriageParams, budget: BudgetParams) -> Self {
        Self {
            planner,
            triage,
            budget,
        }
    }

    pub fn with_planner(mut self, planner: PlannerParams) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_triage(mut self, triage: TriageParams) -> Self {
        self.triage = triage;
        self
    }

    pub fn with_cost_budget(mut self, usd: f64) -> Self {
        self.budget.cost_budget_usd = usd;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_domain::{ConsensusMethod, EscalationRule};

    #[test]
    fn test_default() {
        let config = PlannerConfig::default();
        assert_eq!(config.planner.consensus_method, ConsensusMethod::Btl);
        assert_eq!(config.triage.escalation_rule, EscalationRule::Majority);
        assert_eq!(config.triage.default_domain, "general");
        assert!((config.triage.role_match_threshold - 0.6).abs() < 1e-12);
        assert!((config.budget.cost_budget_usd - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_builder() {
        let config = PlannerConfig::default()
            .with_planner(PlannerParams::default().with_max_rounds(1))
            .with_cost_budget(0.5);
        assert_eq!(config.planner.max_rounds, 1);
        assert!((config.budget.cost_budget_usd - 0.5).abs() < 1e-12);
    }
}
