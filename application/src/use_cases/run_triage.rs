//! Run Triage use case
//!
//! Asks three fast judges, one per perspective, whether a request needs the
//! full multi-round planner. Votes are sanitized against the role/domain
//! vocabulary and merged by [`TriageConsensus`].

use crate::config::TriageParams;
use crate::ports::collaborator::{CollaboratorError, TaskRequest, TriageJudge};
use crate::ports::planning_logger::{NoPlanningLogger, PlanningEvent, PlanningEventLogger};
use crate::ports::progress::{NoProgress, PlanningProgress};
use crate::ports::vocabulary::{Vocabulary, VocabularyKind};
use crate::use_cases::fan_out::fan_out;
use planner_domain::{CostTracker, TriageConsensus, TriagePerspective, TriageVote};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Triage votes are sampled deterministically.
pub const TRIAGE_TEMPERATURE: f64 = 0.0;

/// Errors that can occur during triage
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TriageError {
    #[error("Request description is empty")]
    EmptyRequest,
}

/// Use case for the proceed/escalate decision
pub struct RunTriageUseCase {
    judge: Arc<dyn TriageJudge>,
    vocabulary: Arc<dyn Vocabulary>,
    params: TriageParams,
    max_concurrency: usize,
    logger: Arc<dyn PlanningEventLogger>,
}

impl RunTriageUseCase {
    pub fn new(judge: Arc<dyn TriageJudge>, vocabulary: Arc<dyn Vocabulary>) -> Self {
        Self {
            judge,
            vocabulary,
            params: TriageParams::default(),
            max_concurrency: 3,
            logger: Arc::new(NoPlanningLogger),
        }
    }

    pub fn with_params(mut self, params: TriageParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = limit.max(1);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn PlanningEventLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn params(&self) -> &TriageParams {
        &self.params
    }

    /// Execute triage with its own cost accounting and no progress callbacks
    pub async fn execute(&self, request: &TaskRequest) -> Result<TriageConsensus, TriageError> {
        let mut tracker = CostTracker::new(f64::INFINITY);
        self.execute_with_tracker(request, &mut tracker, &NoProgress)
            .await
    }

    /// Execute triage, charging token usage to `tracker`
    pub async fn execute_with_tracker(
        &self,
        request: &TaskRequest,
        tracker: &mut CostTracker,
        progress: &dyn PlanningProgress,
    ) -> Result<TriageConsensus, TriageError> {
        if request.description.trim().is_empty() {
            return Err(TriageError::EmptyRequest);
        }

        info!("Starting triage with {} perspectives", TriagePerspective::ALL.len());

        let judge = Arc::clone(&self.judge);
        let task = request.clone();
        let results = fan_out(
            TriagePerspective::ALL.to_vec(),
            self.max_concurrency,
            move |perspective| {
                let judge = Arc::clone(&judge);
                let task = task.clone();
                async move { judge.vote(&task, perspective, TRIAGE_TEMPERATURE).await }
            },
        )
        .await;

        let votes: Vec<TriageVote> = TriagePerspective::ALL
            .iter()
            .zip(results)
            .map(|(&perspective, result)| match result {
                Ok(metered) => {
                    if let Some(usage) = &metered.usage {
                        tracker.record(usage);
                    }
                    let mut vote = metered.value;
                    // The perspective is ours to assign, not the judge's.
                    vote.perspective = perspective;
                    debug!("Triage vote from {}: {:?}", perspective, vote.decision);
                    self.sanitize(vote)
                }
                Err(e) => {
                    warn!("Triage judge for {} failed: {}", perspective, e);
                    failed_vote(perspective, &e)
                }
            })
            .collect();

        let consensus = TriageConsensus::from_votes_with_rule(votes, &self.params.escalation_rule);

        info!(
            "Triage decided {} ({})",
            if consensus.should_escalate {
                "escalate"
            } else {
                "proceed"
            },
            consensus.vote_summary()
        );
        progress.on_triage_complete(&consensus);
        self.logger.log(PlanningEvent::new(
            "triage_completed",
            serde_json::json!({
                "should_escalate": consensus.should_escalate,
                "proceed_votes": consensus.decision_votes.proceed,
                "escalate_votes": consensus.decision_votes.escalate,
                "average_confidence": consensus.average_confidence,
                "final_agent_count": consensus.final_agent_count,
                "final_roles": consensus.final_roles,
                "final_domains": consensus.final_domains,
            }),
        ));

        Ok(consensus)
    }

    /// Correct roles and domains against the vocabulary.
    ///
    /// Unmatched roles are dropped; unmatched domains become the default domain.
    fn sanitize(&self, vote: TriageVote) -> TriageVote {
        let mut roles: Vec<String> = Vec::new();
        for raw in &vote.suggested_roles {
            let canonical = self.vocabulary.canonicalize(raw);
            match self.vocabulary.closest_match(
                &canonical,
                VocabularyKind::Role,
                self.params.role_match_threshold,
            ) {
                Some(role) if !roles.contains(&role) => roles.push(role),
                Some(_) => {}
                None => debug!("Dropping unknown role '{}'", raw),
            }
        }

        let mut domains: Vec<String> = Vec::new();
        for raw in &vote.suggested_domains {
            let canonical = self.vocabulary.canonicalize(raw);
            let domain = self
                .vocabulary
                .closest_match(
                    &canonical,
                    VocabularyKind::Domain,
                    self.params.domain_match_threshold,
                )
                .unwrap_or_else(|| {
                    debug!(
                        "Unknown domain '{}', using '{}'",
                        raw, self.params.default_domain
                    );
                    self.params.default_domain.clone()
                });
            if !domains.contains(&domain) {
                domains.push(domain);
            }
        }

        TriageVote {
            suggested_roles: roles,
            suggested_domains: domains,
            ..vote
        }
        .normalized()
    }
}

/// A judge that could not answer votes to escalate with no confidence.
fn failed_vote(perspective: TriagePerspective, error: &CollaboratorError) -> TriageVote {
    TriageVote::escalate(
        perspective,
        0.0,
        format!("{} judge unavailable: {}", perspective, error),
    )
}
