//! Triage gate domain
//!
//! Three fast judges, one per [`TriagePerspective`], each vote *proceed*
//! (cheap path) or *escalate* (full consensus planning). Escalation needs a
//! majority of the three. When the request proceeds, the judges' draft
//! staffing suggestions are merged into the final recommendation.
//!
//! ```text
//!  efficiency ─┐
//!  scope ──────┼─► TriageConsensus ─► proceed: merged staffing
//!  risk ───────┘                   └► escalate: multi-round planner
//! ```

pub mod consensus;
pub mod rule;
pub mod vote;

pub use consensus::{DecisionVotes, TriageConsensus};
pub use rule::EscalationRule;
pub use vote::{
    MAX_RECOMMENDED_AGENTS, MAX_SUGGESTED_DOMAINS, MAX_SUGGESTED_ROLES, TriageDecision,
    TriagePerspective, TriageVote,
};
