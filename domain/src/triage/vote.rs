//! Triage votes from the three fixed perspectives.

use crate::core::candidate::clamp_unit;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Maximum agents a triage judge may recommend.
pub const MAX_RECOMMENDED_AGENTS: u32 = 10;
/// Maximum roles kept per vote and in the merged consensus.
pub const MAX_SUGGESTED_ROLES: usize = 3;
/// Maximum domains kept per vote and in the merged consensus.
pub const MAX_SUGGESTED_DOMAINS: usize = 2;

/// The lens a triage judge evaluates the request through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriagePerspective {
    /// Can this be done cheaply without full planning?
    Efficiency,
    /// Is the request small and well-bounded?
    Scope,
    /// What breaks if a quick plan is wrong?
    Risk,
}

impl TriagePerspective {
    pub const ALL: [TriagePerspective; 3] = [
        TriagePerspective::Efficiency,
        TriagePerspective::Scope,
        TriagePerspective::Risk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriagePerspective::Efficiency => "efficiency",
            TriagePerspective::Scope => "scope",
            TriagePerspective::Risk => "risk",
        }
    }
}

impl std::fmt::Display for TriagePerspective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the request can take the cheap path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriageDecision {
    Proceed,
    Escalate,
}

impl TriageDecision {
    pub fn is_escalate(&self) -> bool {
        matches!(self, TriageDecision::Escalate)
    }
}

impl std::str::FromStr for TriageDecision {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proceed" => Ok(TriageDecision::Proceed),
            "escalate" => Ok(TriageDecision::Escalate),
            other => Err(DomainError::InvalidDecision(other.to_string())),
        }
    }
}

/// A single triage judgment.
///
/// # Example
///
/// ```
/// use planner_domain::triage::{TriagePerspective, TriageVote};
///
/// let vote = TriageVote::proceed(TriagePerspective::Scope, 0.9, "one file change")
///     .with_agents(14)
///     .with_roles(["backend", "tester", "reviewer", "writer"]);
/// assert_eq!(vote.recommended_agents, 10);
/// assert_eq!(vote.suggested_roles.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageVote {
    pub perspective: TriagePerspective,
    pub decision: TriageDecision,
    /// Clamped to `[0, 1]`
    pub confidence: f64,
    pub reasoning: String,
    /// Clamped to `[0, 10]`
    pub recommended_agents: u32,
    /// At most 3
    pub suggested_roles: Vec<String>,
    /// At most 2
    pub suggested_domains: Vec<String>,
}

impl TriageVote {
    pub fn new(
        perspective: TriagePerspective,
        decision: TriageDecision,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            perspective,
            decision,
            confidence: clamp_unit(confidence),
            reasoning: reasoning.into(),
            recommended_agents: 0,
            suggested_roles: Vec::new(),
            suggested_domains: Vec::new(),
        }
    }

    pub fn proceed(
        perspective: TriagePerspective,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self::new(perspective, TriageDecision::Proceed, confidence, reasoning)
    }

    pub fn escalate(
        perspective: TriagePerspective,
        confidence: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self::new(perspective, TriageDecision::Escalate, confidence, reasoning)
    }

    pub fn with_agents(mut self, agents: u32) -> Self {
        self.recommended_agents = agents.min(MAX_RECOMMENDED_AGENTS);
        self
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggested_roles = roles
            .into_iter()
            .map(Into::into)
            .take(MAX_SUGGESTED_ROLES)
            .collect();
        self
    }

    pub fn with_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.suggested_domains = domains
            .into_iter()
            .map(Into::into)
            .take(MAX_SUGGESTED_DOMAINS)
            .collect();
        self
    }

    /// Re-apply the field limits, e.g. after deserializing judge output.
    pub fn normalized(mut self) -> Self {
        self.confidence = clamp_unit(self.confidence);
        self.recommended_agents = self.recommended_agents.min(MAX_RECOMMENDED_AGENTS);
        self.suggested_roles.truncate(MAX_SUGGESTED_ROLES);
        self.suggested_domains.truncate(MAX_SUGGESTED_DOMAINS);
        self
    }

    pub fn is_escalate(&self) -> bool {
        self.decision.is_escalate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_applied() {
        let vote = TriageVote::escalate(TriagePerspective::Risk, 1.4, "touches auth")
            .with_agents(25)
            .with_domains(["security", "backend", "infra"]);
        assert_eq!(vote.confidence, 1.0);
        assert_eq!(vote.recommended_agents, MAX_RECOMMENDED_AGENTS);
        assert_eq!(vote.suggested_domains, vec!["security", "backend"]);
        assert!(vote.is_escalate());
    }

    #[test]
    fn test_normalized_after_deserialize() {
        let json = r#"{
            "perspective": "efficiency",
            "decision": "proceed",
            "confidence": -0.5,
            "reasoning": "trivial",
            "recommended_agents": 99,
            "suggested_roles": ["a", "b", "c", "d"],
            "suggested_domains": []
        }"#;
        let vote: TriageVote = serde_json::from_str(json).unwrap();
        let vote = vote.normalized();
        assert_eq!(vote.confidence, 0.0);
        assert_eq!(vote.recommended_agents, 10);
        assert_eq!(vote.suggested_roles.len(), 3);
    }

    #[test]
    fn test_parse_decision() {
        assert_eq!(
            " Escalate ".parse::<TriageDecision>().ok(),
            Some(TriageDecision::Escalate)
        );
        assert!("maybe".parse::<TriageDecision>().is_err());
    }
}
