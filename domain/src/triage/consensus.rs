//! Aggregation of triage votes into a single decision.

use super::rule::EscalationRule;
use super::vote::{MAX_SUGGESTED_DOMAINS, MAX_SUGGESTED_ROLES, TriageDecision, TriageVote};
use serde::{Deserialize, Serialize};

/// Vote tally by decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecisionVotes {
    pub proceed: usize,
    pub escalate: usize,
}

impl DecisionVotes {
    pub fn total(&self) -> usize {
        self.proceed + self.escalate
    }
}

/// Outcome of a triage round.
///
/// The `final_*` fields and `consensus_reasoning` are only populated when the
/// request does not escalate; the consensus planner takes over otherwise.
///
/// # Example
///
/// ```
/// use planner_domain::triage::{TriageConsensus, TriagePerspective, TriageVote};
///
/// let consensus = TriageConsensus::from_votes(vec![
///     TriageVote::proceed(TriagePerspective::Efficiency, 0.9, "small").with_agents(2),
///     TriageVote::proceed(TriagePerspective::Scope, 0.8, "bounded").with_agents(4),
///     TriageVote::escalate(TriagePerspective::Risk, 0.4, "touches billing"),
/// ]);
/// assert!(!consensus.should_escalate);
/// assert_eq!(consensus.final_agent_count, Some(4));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageConsensus {
    pub should_escalate: bool,
    pub decision_votes: DecisionVotes,
    /// Mean confidence of every vote, regardless of decision
    pub average_confidence: f64,
    pub final_agent_count: Option<u32>,
    pub final_roles: Option<Vec<String>>,
    pub final_domains: Option<Vec<String>>,
    pub consensus_reasoning: Option<String>,
    pub votes: Vec<TriageVote>,
}

impl TriageConsensus {
    /// Aggregate with the default majority rule.
    pub fn from_votes(votes: Vec<TriageVote>) -> Self {
        Self::from_votes_with_rule(votes, &EscalationRule::Majority)
    }

    /// Aggregate with a specific escalation rule.
    pub fn from_votes_with_rule(votes: Vec<TriageVote>, rule: &EscalationRule) -> Self {
        let escalate = votes.iter().filter(|v| v.is_escalate()).count();
        let decision_votes = DecisionVotes {
            proceed: votes.len() - escalate,
            escalate,
        };
        let should_escalate = rule.is_satisfied(escalate, votes.len());

        let average_confidence = if votes.is_empty() {
            0.0
        } else {
            votes.iter().map(|v| v.confidence).sum::<f64>() / votes.len() as f64
        };

        let mut consensus = Self {
            should_escalate,
            decision_votes,
            average_confidence,
            final_agent_count: None,
            final_roles: None,
            final_domains: None,
            consensus_reasoning: None,
            votes,
        };

        if !should_escalate {
            consensus.final_agent_count = consensus.votes.iter().map(|v| v.recommended_agents).max();
            consensus.final_roles = Some(merge_roles(&consensus.votes));
            consensus.final_domains = Some(merge_domains(&consensus.votes));
            consensus.consensus_reasoning = Some(proceed_reasoning(&consensus.votes));
        }

        consensus
    }

    /// Whether every vote agreed.
    pub fn is_unanimous(&self) -> bool {
        self.decision_votes.proceed == 0 || self.decision_votes.escalate == 0
    }

    /// Visual vote summary, e.g. `"[▲▲○]"` (▲ = escalate).
    pub fn vote_summary(&self) -> String {
        let marks: String = self
            .votes
            .iter()
            .map(|v| match v.decision {
                TriageDecision::Escalate => '▲',
                TriageDecision::Proceed => '○',
            })
            .collect();
        format!("[{}]", marks)
    }
}

/// Roles ordered by how many votes suggested them, first appearance breaking
/// ties, capped at 3.
fn merge_roles(votes: &[TriageVote]) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for role in votes.iter().flat_map(|v| &v.suggested_roles) {
        match counts.iter_mut().find(|(r, _)| r == role) {
            Some((_, n)) => *n += 1,
            None => counts.push((role.clone(), 1)),
        }
    }
    // Stable sort keeps first-seen order within equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(MAX_SUGGESTED_ROLES)
        .map(|(r, _)| r)
        .collect()
}

/// Union of suggested domains in first-seen order, capped at 2.
fn merge_domains(votes: &[TriageVote]) -> Vec<String> {
    let mut domains: Vec<String> = Vec::new();
    for domain in votes.iter().flat_map(|v| &v.suggested_domains) {
        if !domains.contains(domain) {
            domains.push(domain.clone());
        }
    }
    domains.truncate(MAX_SUGGESTED_DOMAINS);
    domains
}

fn proceed_reasoning(votes: &[TriageVote]) -> String {
    votes
        .iter()
        .filter(|v| !v.is_escalate())
        .map(|v| v.reasoning.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}
