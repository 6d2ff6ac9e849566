use serde::{Deserialize, Serialize};

/// One phase of a staffed plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanPhase {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub agent_count: u32,
}

impl PlanPhase {
    pub fn new(name: impl Into<String>, agent_count: u32) -> Self {
        Self {
            name: name.into(),
            roles: Vec::new(),
            agent_count,
        }
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }
}

/// A refined, validated plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalPlan {
    pub summary: String,
    pub phases: Vec<PlanPhase>,
    /// Refiner-specific extra data, passed through untouched.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl FinalPlan {
    pub fn new(summary: impl Into<String>, phases: Vec<PlanPhase>) -> Self {
        Self {
            summary: summary.into(),
            phases,
            payload: serde_json::Value::Null,
        }
    }

    /// Total agents across all phases, saturating at `u32::MAX`.
    pub fn total_agents(&self) -> u32 {
        self.phases
            .iter()
            .map(|p| p.agent_count)
            .fold(0u32, u32::saturating_add)
    }
}
