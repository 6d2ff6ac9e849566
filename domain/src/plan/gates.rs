use super::entities::{FinalPlan, PlanPhase};
use serde::{Deserialize, Serialize};

pub const MIN_PHASES: usize = 3;
pub const MAX_PHASES: usize = 7;

/// Names used when padding a short plan, in order.
const PADDING_PHASES: [&str; 2] = ["Integration", "Verification"];

/// A change made by [`FinalPlan::enforce_gates`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateAdjustment {
    /// Phases beyond the maximum were folded into the last kept phase.
    MergedTrailingPhases { removed: usize },
    /// Placeholder phases were appended to reach the minimum.
    PaddedPhases { added: usize },
    /// A phase had no agents and was given one.
    StaffedEmptyPhase { phase: String },
}

impl FinalPlan {
    /// Clamp the phase count to `3..=7` and give every phase at least one agent.
    ///
    /// Excess phases are merged into phase 7 (roles unioned, agents summed).
    /// Missing phases are appended as single-agent placeholders.
    pub fn enforce_gates(&mut self) -> Vec<GateAdjustment> {
        let mut adjustments = Vec::new();

        if self.phases.len() > MAX_PHASES {
            let tail: Vec<PlanPhase> = self.phases.drain(MAX_PHASES..).collect();
            let removed = tail.len();
            if let Some(last) = self.phases.last_mut() {
                for phase in tail {
                    last.agent_count = last.agent_count.saturating_add(phase.agent_count);
                    for role in phase.roles {
                        if !last.roles.contains(&role) {
                            last.roles.push(role);
                        }
                    }
                }
            }
            adjustments.push(GateAdjustment::MergedTrailingPhases { removed });
        }

        if self.phases.len() < MIN_PHASES {
            let added = MIN_PHASES - self.phases.len();
            for _ in 0..added {
                let name = self.padding_name();
                self.phases.push(PlanPhase::new(name, 1));
            }
            adjustments.push(GateAdjustment::PaddedPhases { added });
        }

        for phase in &mut self.phases {
            if phase.agent_count == 0 {
                phase.agent_count = 1;
                adjustments.push(GateAdjustment::StaffedEmptyPhase {
                    phase: phase.name.clone(),
                });
            }
        }

        adjustments
    }

    fn padding_name(&self) -> String {
        PADDING_PHASES
            .iter()
            .find(|name| !self.phases.iter().any(|p| p.name == **name))
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("Phase {}", self.phases.len() + 1))
    }
}
