//! Plan Task use case
//!
//! Composes the two tiers: the triage gate decides whether the request is
//! simple enough for its merged recommendation, and only escalated requests
//! pay for the multi-round planner. Both tiers charge the same cost tracker.

use crate::ports::collaborator::TaskRequest;
use crate::ports::progress::{NoProgress, PlanningProgress};
use crate::use_cases::run_planning::{PlanningError, RunPlanningUseCase};
use crate::use_cases::run_triage::RunTriageUseCase;
use planner_domain::{CostSummary, CostTracker, PlanResponse, TriageConsensus};
use tracing::info;

/// Input for the PlanTask use case
#[derive(Debug, Clone)]
pub struct PlanTaskInput {
    pub request: TaskRequest,
    /// Skip triage and always run the multi-round planner
    pub force_consensus: bool,
}

impl PlanTaskInput {
    pub fn new(request: TaskRequest) -> Self {
        Self {
            request,
            force_consensus: false,
        }
    }

    pub fn force_consensus(mut self) -> Self {
        self.force_consensus = true;
        self
    }
}

/// Outcome of [`PlanTaskUseCase`]
#[derive(Debug, Clone)]
pub enum TaskPlan {
    /// Triage judged the request simple; its merged staffing is the answer.
    Proceed {
        triage: TriageConsensus,
        cost: CostSummary,
    },
    /// The multi-round planner ran. `triage` is absent when it was skipped.
    Escalated {
        triage: Option<TriageConsensus>,
        response: PlanResponse,
    },
}

impl TaskPlan {
    pub fn is_escalated(&self) -> bool {
        matches!(self, TaskPlan::Escalated { .. })
    }

    pub fn triage(&self) -> Option<&TriageConsensus> {
        match self {
            TaskPlan::Proceed { triage, .. } => Some(triage),
            TaskPlan::Escalated { triage, .. } => triage.as_ref(),
        }
    }
}

/// Use case for triage-then-plan
pub struct PlanTaskUseCase {
    triage: RunTriageUseCase,
    planning: RunPlanningUseCase,
}

impl PlanTaskUseCase {
    pub fn new(triage: RunTriageUseCase, planning: RunPlanningUseCase) -> Self {
        Self { triage, planning }
    }

    pub fn planning(&self) -> &RunPlanningUseCase {
        &self.planning
    }

    pub async fn execute(&self, input: PlanTaskInput) -> Result<TaskPlan, PlanningError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: PlanTaskInput,
        progress: &dyn PlanningProgress,
    ) -> Result<TaskPlan, PlanningError> {
        let mut tracker = CostTracker::new(self.planning.cost_budget());

        let triage = if input.force_consensus {
            info!("Triage skipped, consensus planning forced");
            None
        } else {
            let consensus = self
                .triage
                .execute_with_tracker(&input.request, &mut tracker, progress)
                .await?;
            if !consensus.should_escalate {
                return Ok(TaskPlan::Proceed {
                    triage: consensus,
                    cost: tracker.summary(),
                });
            }
            Some(consensus)
        };

        let response = self
            .planning
            .execute_with_tracker(&input.request, &mut tracker, progress)
            .await?;

        Ok(TaskPlan::Escalated { triage, response })
    }
}
