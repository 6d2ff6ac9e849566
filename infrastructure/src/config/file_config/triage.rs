//! Triage configuration from TOML (`[triage]` section)

use planner_application::config::TriageParams;
use planner_domain::{ConfigIssue, ConfigIssueCode, EscalationRule};
use serde::{Deserialize, Serialize};

/// Raw triage configuration from TOML
///
/// # Example
///
/// ```toml
/// [triage]
/// escalation_rule = "majority"        # "majority", "unanimous", "atleast:N"
/// role_match_threshold = 0.6
/// domain_match_threshold = 0.5
/// default_domain = "general"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTriageConfig {
    pub escalation_rule: String,
    pub role_match_threshold: f64,
    pub domain_match_threshold: f64,
    pub default_domain: String,
}

impl Default for FileTriageConfig {
    fn default() -> Self {
        let params = TriageParams::default();
        Self {
            escalation_rule: "majority".to_string(),
            role_match_threshold: params.role_match_threshold,
            domain_match_threshold: params.domain_match_threshold,
            default_domain: params.default_domain,
        }
    }
}

impl FileTriageConfig {
    /// Parse escalation_rule, warning and falling back to majority.
    pub fn parse_escalation_rule(&self) -> (EscalationRule, Vec<ConfigIssue>) {
        match self.escalation_rule.parse::<EscalationRule>() {
            Ok(rule) => (rule, vec![]),
            Err(_) => {
                let issue = ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "triage.escalation_rule".to_string(),
                        value: self.escalation_rule.clone(),
                        valid_values: vec![
                            "majority".to_string(),
                            "unanimous".to_string(),
                            "atleast:N".to_string(),
                        ],
                    },
                    format!(
                        "triage.escalation_rule: unknown value '{}', falling back to 'majority'",
                        self.escalation_rule
                    ),
                );
                (EscalationRule::default(), vec![issue])
            }
        }
    }

    pub fn to_params(&self) -> (TriageParams, Vec<ConfigIssue>) {
        let defaults = TriageParams::default();
        let (escalation_rule, mut issues) = self.parse_escalation_rule();

        let role_match_threshold = unit_threshold(
            "triage.role_match_threshold",
            self.role_match_threshold,
            defaults.role_match_threshold,
            &mut issues,
        );
        let domain_match_threshold = unit_threshold(
            "triage.domain_match_threshold",
            self.domain_match_threshold,
            defaults.domain_match_threshold,
            &mut issues,
        );

        let default_domain = if self.default_domain.trim().is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ZeroValue {
                    field: "triage.default_domain".to_string(),
                },
                format!(
                    "triage.default_domain: empty, using '{}'",
                    defaults.default_domain
                ),
            ));
            defaults.default_domain
        } else {
            self.default_domain.trim().to_string()
        };

        let params = TriageParams {
            escalation_rule,
            role_match_threshold,
            domain_match_threshold,
            default_domain,
        };
        (params, issues)
    }
}

/// Similarity thresholds live in `[0, 1]`.
fn unit_threshold(field: &str, value: f64, fallback: f64, issues: &mut Vec<ConfigIssue>) -> f64 {
    if (0.0..=1.0).contains(&value) {
        return value;
    }
    let adjusted = if value.is_nan() {
        fallback
    } else {
        value.clamp(0.0, 1.0)
    };
    issues.push(ConfigIssue::warning(
        ConfigIssueCode::OutOfRange {
            field: field.to_string(),
        },
        format!("{}: {} is outside [0, 1], using {}", field, value, adjusted),
    ));
    adjusted
}
