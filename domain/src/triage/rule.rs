//! Rules for deciding escalation from triage votes.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// How many escalate votes are needed to escalate.
///
/// - `Majority`: more than half (2 of 3, the default)
/// - `Unanimous`: every vote
/// - `AtLeast(n)`: at least n votes
///
/// # Example
///
/// ```
/// use planner_domain::triage::EscalationRule;
///
/// let rule = EscalationRule::Majority;
/// assert!(rule.is_satisfied(2, 3));
/// assert!(!rule.is_satisfied(1, 3));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EscalationRule {
    #[default]
    Majority,
    Unanimous,
    AtLeast(usize),
}

impl EscalationRule {
    /// Check if `escalations` out of `total` votes trigger escalation.
    pub fn is_satisfied(&self, escalations: usize, total: usize) -> bool {
        if total == 0 {
            return false;
        }

        match self {
            EscalationRule::Majority => escalations > total / 2,
            EscalationRule::Unanimous => escalations == total,
            EscalationRule::AtLeast(n) => escalations >= *n,
        }
    }

    pub fn description(&self) -> String {
        match self {
            EscalationRule::Majority => "majority (more than half)".to_string(),
            EscalationRule::Unanimous => "unanimous (all must escalate)".to_string(),
            EscalationRule::AtLeast(n) => format!("at least {} escalations", n),
        }
    }
}

impl std::fmt::Display for EscalationRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for EscalationRule {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "majority" => Ok(EscalationRule::Majority),
            "unanimous" => Ok(EscalationRule::Unanimous),
            s if s.starts_with("atleast:") || s.starts_with("at_least:") => s
                .split(':')
                .nth(1)
                .and_then(|n| n.trim().parse().ok())
                .map(EscalationRule::AtLeast)
                .ok_or_else(|| DomainError::UnknownEscalationRule(s.to_string())),
            _ => Err(DomainError::UnknownEscalationRule(s.to_string())),
        }
    }
}
