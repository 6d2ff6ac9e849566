//! Triage gate parameters.

use planner_domain::EscalationRule;
use serde::{Deserialize, Serialize};

/// Controls how triage votes are sanitized and combined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageParams {
    pub escalation_rule: EscalationRule,
    /// Minimum similarity for a suggested role to be accepted
    pub role_match_threshold: f64,
    /// Minimum similarity for a suggested domain to be accepted
    pub domain_match_threshold: f64,
    /// Substituted for domains that match nothing
    pub default_domain: String,
}

impl Default for TriageParams {
    fn default() -> Self {
        Self {
            escalation_rule: EscalationRule::Majority,
            role_match_threshold: 0.6,
            domain_match_threshold: 0.5,
            default_domain: "general".to_string(),
        }
    }
}

impl TriageParams {
    pub fn with_escalation_rule(mut self, rule: EscalationRule) -> Self {
        self.escalation_rule = rule;
        self
    }

    pub fn with_match_thresholds(mut self, role: f64, domain: f64) -> Self {
        self.role_match_threshold = role;
        self.domain_match_threshold = domain;
        self
    }

    pub fn with_default_domain(mut self, domain: impl Into<String>) -> Self {
        self.default_domain = domain.into();
        self
    }
}
