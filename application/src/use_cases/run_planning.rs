//! Run Planning use case
//!
//! Drives the multi-round consensus loop:
//!
//! ```text
//! round k: generate N candidates ─► judge sampled pairs ─► aggregate
//!          └─ converged? ─► refine best ─► gates ─► PlanResponse
//!          └─ otherwise next round (until rounds, deadline or cost run out)
//! ```
//!
//! Collaborator failures are per item: a failing generator slot or judge call
//! is dropped from its batch and the round goes on with what came back.

use crate::config::{BudgetParams, PlannerConfig, PlannerParams};
use crate::ports::collaborator::{
    CandidateGenerator, CollaboratorError, GenerationRequest, PairwiseJudge, Refiner, RubricJudge,
    TaskRequest,
};
use crate::ports::planning_logger::{NoPlanningLogger, PlanningEvent, PlanningEventLogger};
use crate::ports::progress::{NoProgress, PlanningProgress};
use crate::use_cases::fan_out::fan_out;
use crate::use_cases::pair_selection::{PairSelector, UniformPairSelector};
use crate::use_cases::run_triage::TriageError;
use planner_domain::{
    Candidate, ConsensusEngine, CostTracker, Degradation, JudgeReliability, Judgment, LoopState,
    PairwiseComparison, PlanResponse, RankingResult, RawComparison, RoundState, Termination,
    TokenUsage,
};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Confidence reported when no comparison came back.
pub const FALLBACK_CONFIDENCE: f64 = 0.5;

/// Confidence multiplier applied when refinement fails.
pub const REFINEMENT_FAILURE_PENALTY: f64 = 0.8;

/// Errors that prevent a planning session from starting
///
/// Failures during the session (no candidates, no comparisons, refinement)
/// are reported through [`PlanResponse`] instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    #[error("Request description is empty")]
    EmptyRequest,

    #[error("No pairwise judges configured")]
    NoJudges,

    #[error("Invalid planner parameters: {0}")]
    InvalidParams(String),

    #[error("Triage failed: {0}")]
    Triage(#[from] TriageError),
}

/// Confidence of an aggregated winner: 0.5 at zero margin, 1.0 once the
/// margin reaches the convergence threshold.
pub fn aggregated_confidence(margin: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return 1.0;
    }
    0.5 + 0.5 * (margin / threshold).clamp(0.0, 1.0)
}

/// Use case for multi-round consensus planning
///
/// The judge reliability estimate lives here and carries over between
/// sessions run by the same instance.
pub struct RunPlanningUseCase {
    generator: Arc<dyn CandidateGenerator>,
    judges: Vec<Arc<dyn PairwiseJudge>>,
    refiner: Arc<dyn Refiner>,
    rubric_judge: Option<Arc<dyn RubricJudge>>,
    pair_selector: Option<Arc<dyn PairSelector>>,
    logger: Arc<dyn PlanningEventLogger>,
    reliability: Mutex<JudgeReliability>,
    params: PlannerParams,
    cost_budget: f64,
    cancellation: Option<CancellationToken>,
}

impl RunPlanningUseCase {
    pub fn new(
        generator: Arc<dyn CandidateGenerator>,
        judges: Vec<Arc<dyn PairwiseJudge>>,
        refiner: Arc<dyn Refiner>,
    ) -> Self {
        let reliability = JudgeReliability::new(judges.len(), 2);
        Self {
            generator,
            judges,
            refiner,
            rubric_judge: None,
            pair_selector: None,
            logger: Arc::new(NoPlanningLogger),
            reliability: Mutex::new(reliability),
            params: PlannerParams::default(),
            cost_budget: BudgetParams::default().cost_budget_usd,
            cancellation: None,
        }
    }

    /// Apply the planner and budget sections of a loaded configuration.
    pub fn with_config(self, config: &PlannerConfig) -> Self {
        self.with_params(config.planner.clone())
            .with_cost_budget(config.budget.cost_budget_usd)
    }

    pub fn with_params(mut self, params: PlannerParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_cost_budget(mut self, usd: f64) -> Self {
        self.cost_budget = usd;
        self
    }

    pub fn with_rubric_judge(mut self, judge: Arc<dyn RubricJudge>) -> Self {
        self.rubric_judge = Some(judge);
        self
    }

    /// Replace uniform pair sampling.
    pub fn with_pair_selector(mut self, selector: Arc<dyn PairSelector>) -> Self {
        self.pair_selector = Some(selector);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn PlanningEventLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Stop between rounds once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn params(&self) -> &PlannerParams {
        &self.params
    }

    pub fn cost_budget(&self) -> f64 {
        self.cost_budget
    }

    /// Snapshot of the current judge reliability estimate.
    pub fn reliability(&self) -> JudgeReliability {
        self.reliability
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Execute the use case with its own cost tracker and no progress callbacks
    pub async fn execute(&self, request: &TaskRequest) -> Result<PlanResponse, PlanningError> {
        let mut tracker = CostTracker::new(self.cost_budget);
        self.execute_with_tracker(request, &mut tracker, &NoProgress)
            .await
    }

    /// Execute the use case, charging token usage to `tracker`
    pub async fn execute_with_tracker(
        &self,
        request: &TaskRequest,
        tracker: &mut CostTracker,
        progress: &dyn PlanningProgress,
    ) -> Result<PlanResponse, PlanningError> {
        self.validate(request)?;

        let params = &self.params;
        let engine = ConsensusEngine::new(params.consensus_method)
            .with_threshold(params.convergence_threshold);
        let selector: Arc<dyn PairSelector> = match &self.pair_selector {
            Some(selector) => Arc::clone(selector),
            None => Arc::new(UniformPairSelector::new(params.sampling_seed)),
        };

        let started = Instant::now();
        let deadline = started + params.time_budget();
        let mut state = RoundState::new();
        let mut ranking: Option<RankingResult> = None;
        let mut degradations = Vec::new();

        info!(
            "Starting planning: up to {} rounds, {} candidates per round, method {}",
            params.max_rounds,
            params.candidates_per_round,
            engine.method()
        );

        let termination = loop {
            if state.round_number >= params.max_rounds {
                break Termination::MaxRounds;
            }
            if Instant::now() >= deadline {
                info!("Time budget exhausted after {} rounds", state.round_number);
                break Termination::Deadline;
            }
            if self.is_cancelled() {
                info!("Planning cancelled after {} rounds", state.round_number);
                break Termination::Cancelled;
            }

            state.begin_round();
            let round = state.round_number;
            self.logger.log(PlanningEvent::new(
                "round_started",
                serde_json::json!({
                    "round": round,
                    "best_margin": state.best_margin,
                }),
            ));

            // Phase 1: Generate
            progress.on_state(round, LoopState::Generating);
            state.candidates = self
                .generate(request, round, state.best_candidate.as_ref(), tracker, progress)
                .await;

            if state.candidates.is_empty() {
                if state.best_candidate.is_none() {
                    state.state = LoopState::Failed;
                    warn!("Round {} produced no candidates, planning failed", round);
                    let response = PlanResponse::failure(
                        format!("no candidates were generated in round {}", round),
                        round,
                        tracker.summary(),
                    );
                    self.log_finished(&response);
                    return Ok(response);
                }
                warn!(
                    "Round {} produced no candidates, keeping the best earlier result",
                    round
                );
                state.state = LoopState::Exhausted;
                break Termination::NoCandidates;
            }

            // Phase 2: Judge
            state.state = LoopState::Judging;
            progress.on_state(round, LoopState::Judging);
            state.comparisons = self
                .judge(request, round, &state.candidates, selector.as_ref(), tracker, progress)
                .await;

            if state.comparisons.is_empty() {
                warn!(
                    "Round {} returned no comparisons, falling back to the first candidate",
                    round
                );
                if let Some(first) = state.candidates.first().cloned() {
                    state.fallback_best(&first, FALLBACK_CONFIDENCE);
                }
                degradations.push(Degradation::NoComparisons);
                state.state = LoopState::Exhausted;
                break Termination::NoComparisons;
            }

            // Phase 3: Aggregate
            state.state = LoopState::Aggregating;
            progress.on_state(round, LoopState::Aggregating);
            let round_ranking = self.aggregate(&engine, &state.candidates, &state.comparisons);
            let margin = round_ranking.top_margin;
            let winner = round_ranking
                .top()
                .and_then(|id| state.candidates.iter().find(|c| c.id == id))
                .cloned();

            if let Some(winner) = &winner {
                let confidence = aggregated_confidence(margin, params.convergence_threshold);
                if state.offer_best(winner, margin, confidence) {
                    ranking = Some(round_ranking.clone());
                }
            }

            info!(
                "Round {}: {} comparisons, margin {:.4} (best {:.4})",
                round,
                state.comparisons.len(),
                margin,
                state.best_margin
            );
            self.logger.log(PlanningEvent::new(
                "round_aggregated",
                serde_json::json!({
                    "round": round,
                    "method": engine.method().as_str(),
                    "ranked_ids": round_ranking.ranked_ids,
                    "winner_id": winner.as_ref().map(|c| c.id.clone()),
                    "margin": margin,
                    "best_margin": state.best_margin,
                    "comparisons": state.comparisons.len(),
                }),
            ));
            progress.on_round_complete(round, margin);

            if engine.converged(margin) {
                state.state = LoopState::Converged;
                info!("Converged in round {}", round);
                break Termination::Converged;
            }
            if tracker.should_stop() {
                state.state = LoopState::Exhausted;
                info!(
                    "Cost budget nearly spent (${:.4} of ${:.4})",
                    tracker.total_cost(),
                    tracker.cost_budget()
                );
                break Termination::CostBudget;
            }
            state.state = LoopState::Continue;
            debug!("Round {} did not converge, continuing", round);
        };
        state.elapsed = started.elapsed();

        let Some(best) = state.best_candidate.clone() else {
            let mut response = PlanResponse::failure(
                "planning stopped before any candidate was ranked",
                state.round_number,
                tracker.summary(),
            );
            response.termination = termination;
            self.log_finished(&response);
            return Ok(response);
        };

        // Refine the winner once; a failure keeps the raw candidate.
        let mut confidence = state.best_confidence;
        let mut gate_adjustments = Vec::new();
        let plan = match self
            .refiner
            .refine(std::slice::from_ref(&best), request)
            .await
        {
            Ok(metered) => {
                record_usage(tracker, metered.usage.as_ref());
                let mut plan = metered.value;
                gate_adjustments = plan.enforce_gates();
                if !gate_adjustments.is_empty() {
                    info!("Plan gates adjusted the refined plan: {:?}", gate_adjustments);
                }
                Some(plan)
            }
            Err(e) => {
                warn!("Refinement failed, returning the best raw candidate: {}", e);
                confidence *= REFINEMENT_FAILURE_PENALTY;
                degradations.push(Degradation::RefinementFailed(e.to_string()));
                None
            }
        };

        let rubric_score = self.score_rubric(&best, request, tracker).await;

        let response = PlanResponse {
            success: true,
            candidate: Some(best),
            plan,
            confidence,
            margin: state.best_margin,
            rounds_completed: state.round_number,
            termination,
            degradations,
            gate_adjustments,
            ranking,
            rubric_score,
            cost: tracker.summary(),
            error: None,
        };

        info!(
            "Planning finished after {} rounds in {:?}: {:?}, confidence {:.2}",
            response.rounds_completed, state.elapsed, response.termination, response.confidence
        );
        self.log_finished(&response);
        Ok(response)
    }

    fn validate(&self, request: &TaskRequest) -> Result<(), PlanningError> {
        if request.description.trim().is_empty() {
            return Err(PlanningError::EmptyRequest);
        }
        if self.judges.is_empty() {
            return Err(PlanningError::NoJudges);
        }
        if self.params.max_rounds == 0 {
            return Err(PlanningError::InvalidParams(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        if self.params.candidates_per_round == 0 {
            return Err(PlanningError::InvalidParams(
                "candidates_per_round must be at least 1".to_string(),
            ));
        }
        let threshold = self.params.convergence_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(PlanningError::InvalidParams(format!(
                "convergence_threshold must be a non-negative number, got {}",
                threshold
            )));
        }
        Ok(())
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }

    /// Fan out one generation call per slot; failed slots are dropped.
    async fn generate(
        &self,
        request: &TaskRequest,
        round: usize,
        best_so_far: Option<&Candidate>,
        tracker: &mut CostTracker,
        progress: &dyn PlanningProgress,
    ) -> Vec<Candidate> {
        let temperatures = self.params.temperatures(self.params.candidates_per_round);
        let base = GenerationRequest {
            task: request.clone(),
            round,
            slot: 0,
            best_so_far: best_so_far.cloned(),
        };
        let generator = Arc::clone(&self.generator);

        let results = fan_out(
            temperatures.into_iter().enumerate().collect(),
            self.params.concurrency(),
            move |(slot, temperature): (usize, f64)| {
                let generator = Arc::clone(&generator);
                let request = GenerationRequest {
                    slot,
                    ..base.clone()
                };
                async move { generator.generate(&request, temperature).await }
            },
        )
        .await;

        let mut candidates: Vec<Candidate> = Vec::with_capacity(results.len());
        for (slot, result) in results.into_iter().enumerate() {
            match result {
                Ok(metered) => {
                    record_usage(tracker, metered.usage.as_ref());
                    let candidate = metered.value;
                    if candidates.iter().any(|c| c.id == candidate.id) {
                        warn!(
                            "Round {}: dropping duplicate candidate id '{}'",
                            round, candidate.id
                        );
                        progress.on_item_complete(round, LoopState::Generating, false);
                        continue;
                    }
                    self.logger.log(PlanningEvent::new(
                        "candidate_generated",
                        serde_json::json!({
                            "round": round,
                            "slot": slot,
                            "candidate_id": candidate.id,
                        }),
                    ));
                    progress.on_item_complete(round, LoopState::Generating, true);
                    candidates.push(candidate);
                }
                Err(e) => {
                    warn!("Round {}: generator slot {} failed: {}", round, slot, e);
                    progress.on_item_complete(round, LoopState::Generating, false);
                }
            }
        }

        debug!("Round {}: {} candidates generated", round, candidates.len());
        candidates
    }

    /// Judge the selected pairs, assigning judges round-robin.
    async fn judge(
        &self,
        request: &TaskRequest,
        round: usize,
        candidates: &[Candidate],
        selector: &dyn PairSelector,
        tracker: &mut CostTracker,
        progress: &dyn PlanningProgress,
    ) -> Vec<PairwiseComparison> {
        let pairs = selector.select(candidates.len(), self.params.judge_pairs_per_round);
        if pairs.is_empty() {
            return Vec::new();
        }
        info!(
            "Round {}: judging {} pairs with {} judges",
            round,
            pairs.len(),
            self.judges.len()
        );

        // (judge_id, index_a, index_b) per call, in call order
        let assignments: Vec<(usize, usize, usize)> = pairs
            .iter()
            .enumerate()
            .map(|(k, &(i, j))| (k % self.judges.len(), i, j))
            .filter(|&(_, i, j)| i < candidates.len() && j < candidates.len())
            .collect();
        let items: Vec<(usize, Candidate, Candidate)> = assignments
            .iter()
            .map(|&(judge_id, i, j)| (judge_id, candidates[i].clone(), candidates[j].clone()))
            .collect();

        let judges = self.judges.clone();
        let task: Arc<str> = Arc::from(request.description.as_str());
        let results = fan_out(
            items,
            self.params.concurrency(),
            move |(judge_id, a, b): (usize, Candidate, Candidate)| {
                let judge = judges.get(judge_id).cloned();
                let task = Arc::clone(&task);
                async move {
                    let judge = judge.ok_or_else(|| {
                        CollaboratorError::Other(format!("no judge with index {}", judge_id))
                    })?;
                    judge.compare(&a, &b, &task).await
                }
            },
        )
        .await;

        let mut comparisons = Vec::with_capacity(results.len());
        for (&(judge_id, i, j), result) in assignments.iter().zip(results) {
            match result {
                Ok(metered) => {
                    record_usage(tracker, metered.usage.as_ref());
                    let verdict = metered.value;
                    let comparison = PairwiseComparison::new(
                        &candidates[i],
                        &candidates[j],
                        verdict.winner,
                        judge_id,
                        verdict.confidence,
                        verdict.reasoning,
                    );
                    self.logger.log(PlanningEvent::new(
                        "comparison_recorded",
                        serde_json::json!({
                            "round": round,
                            "judge_id": judge_id,
                            "candidate_a_id": comparison.candidate_a_id,
                            "candidate_b_id": comparison.candidate_b_id,
                            "winner_id": comparison.winner_id,
                            "confidence": comparison.confidence,
                        }),
                    ));
                    progress.on_item_complete(round, LoopState::Judging, true);
                    comparisons.push(comparison);
                }
                Err(e) => {
                    warn!(
                        "Round {}: judge {} failed on ({}, {}): {}",
                        round, judge_id, candidates[i].id, candidates[j].id, e
                    );
                    progress.on_item_complete(round, LoopState::Judging, false);
                }
            }
        }
        comparisons
    }

    fn aggregate(
        &self,
        engine: &ConsensusEngine,
        candidates: &[Candidate],
        comparisons: &[PairwiseComparison],
    ) -> RankingResult {
        let ids: Vec<String> = candidates.iter().map(|c| c.id.clone()).collect();
        let raw: Vec<RawComparison> = comparisons
            .iter()
            .filter_map(|c| RawComparison::from_comparison(c, &ids))
            .collect();

        if !self.params.reliability_weighting {
            return engine.rank_candidates(&raw, &ids);
        }

        let mut reliability = self.reliability.lock().unwrap_or_else(|e| e.into_inner());
        reliability.update_reliability(&pair_judgments(&raw, ids.len()));
        debug!("Judge accuracies: {:?}", reliability.accuracies());
        engine.rank_candidates_weighted(&raw, &ids, &reliability)
    }

    async fn score_rubric(
        &self,
        best: &Candidate,
        request: &TaskRequest,
        tracker: &mut CostTracker,
    ) -> Option<f64> {
        let judge = self.rubric_judge.as_ref()?;
        match judge.score(best, &request.description).await {
            Ok(metered) => {
                record_usage(tracker, metered.usage.as_ref());
                Some(metered.value.overall)
            }
            Err(e) => {
                warn!("Rubric scoring failed: {}", e);
                None
            }
        }
    }

    fn log_finished(&self, response: &PlanResponse) {
        self.logger.log(PlanningEvent::new(
            "plan_finished",
            serde_json::json!({
                "success": response.success,
                "termination": response.termination,
                "rounds_completed": response.rounds_completed,
                "candidate_id": response.candidate.as_ref().map(|c| c.id.clone()),
                "confidence": response.confidence,
                "margin": response.margin,
                "degradations": response.degradations,
                "total_cost_usd": response.cost.total_cost,
                "error": response.error,
            }),
        ));
    }
}

fn record_usage(tracker: &mut CostTracker, usage: Option<&TokenUsage>) {
    if let Some(usage) = usage {
        tracker.record(usage);
    }
}

/// Comparisons as reliability judgments.
///
/// Each unordered candidate pair is one item; the label says which side won
/// (0 = lower index, 1 = higher index).
fn pair_judgments(raw: &[RawComparison], n: usize) -> Vec<Judgment> {
    raw.iter()
        .map(|c| {
            let (low, high) = if c.winner < c.loser {
                (c.winner, c.loser)
            } else {
                (c.loser, c.winner)
            };
            let label = usize::from(c.winner != low);
            Judgment::new(c.judge_id, low * n + high, label)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::collaborator::{JudgeVerdict, Metered, RubricScore};
    use async_trait::async_trait;
    use planner_domain::{ConsensusMethod, FinalPlan, PlanPhase, Side};
    use std::time::Duration;

    // ==================== Mocks ====================

    /// Emits `r{round}-c{slot}` candidates and records every request.
    #[derive(Default)]
    struct ScriptedGenerator {
        fail_rounds: Vec<usize>,
        delay: Option<Duration>,
        seen: Mutex<Vec<(usize, usize, f64, Option<String>)>>,
    }

    impl ScriptedGenerator {
        fn failing_in(rounds: &[usize]) -> Self {
            Self {
                fail_rounds: rounds.to_vec(),
                ..Self::default()
            }
        }

        fn slow(delay: Duration) -> Self {
            Self {
                delay: Some(delay),
                ..Self::default()
            }
        }

        fn seen(&self) -> Vec<(usize, usize, f64, Option<String>)> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CandidateGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            request: &GenerationRequest,
            temperature: f64,
        ) -> Result<Metered<Candidate>, CollaboratorError> {
            self.seen.lock().unwrap().push((
                request.round,
                request.slot,
                temperature,
                request.best_so_far.as_ref().map(|c| c.id.clone()),
            ));
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_rounds.contains(&request.round) {
                return Err(CollaboratorError::RequestFailed("generator down".into()));
            }
            Ok(Metered::free(Candidate::new(
                format!("r{}-c{}", request.round, request.slot),
                serde_json::json!({ "slot": request.slot }),
            )))
        }
    }

    #[derive(Clone, Copy)]
    enum Preference {
        /// The lower slot always wins
        LowerSlot,
        /// Adjacent slots: lower wins; otherwise higher wins (a cycle for 3)
        Cycle,
        Fail,
    }

    struct SlotJudge {
        preference: Preference,
        usage: Option<TokenUsage>,
    }

    impl SlotJudge {
        fn new(preference: Preference) -> Self {
            Self {
                preference,
                usage: None,
            }
        }
    }

    fn slot_of(candidate: &Candidate) -> u64 {
        candidate.payload["slot"].as_u64().unwrap()
    }

    #[async_trait]
    impl PairwiseJudge for SlotJudge {
        async fn compare(
            &self,
            a: &Candidate,
            b: &Candidate,
            _task: &str,
        ) -> Result<Metered<JudgeVerdict>, CollaboratorError> {
            let (sa, sb) = (slot_of(a), slot_of(b));
            let winner = match self.preference {
                Preference::LowerSlot => {
                    if sa < sb {
                        Side::A
                    } else {
                        Side::B
                    }
                }
                Preference::Cycle => {
                    if sb == sa + 1 {
                        Side::A
                    } else {
                        Side::B
                    }
                }
                Preference::Fail => return Err(CollaboratorError::Timeout),
            };
            let verdict = JudgeVerdict {
                winner,
                confidence: 0.9,
                reasoning: "scripted".to_string(),
            };
            Ok(Metered {
                value: verdict,
                usage: self.usage.clone(),
            })
        }
    }

    struct StaticRefiner {
        fail: bool,
    }

    #[async_trait]
    impl Refiner for StaticRefiner {
        async fn refine(
            &self,
            top_candidates: &[Candidate],
            _request: &TaskRequest,
        ) -> Result<Metered<FinalPlan>, CollaboratorError> {
            if self.fail {
                return Err(CollaboratorError::MalformedResponse("not json".into()));
            }
            assert_eq!(top_candidates.len(), 1);
            Ok(Metered::free(FinalPlan::new(
                format!("refined {}", top_candidates[0].id),
                vec![PlanPhase::new("Build", 2)],
            )))
        }
    }

    struct FixedRubric;

    #[async_trait]
    impl RubricJudge for FixedRubric {
        async fn score(
            &self,
            _candidate: &Candidate,
            _task: &str,
        ) -> Result<Metered<RubricScore>, CollaboratorError> {
            Ok(Metered::free(RubricScore {
                criteria: [("coverage".to_string(), 0.7)].into_iter().collect(),
                overall: 0.7,
            }))
        }
    }

    fn planner(
        generator: Arc<ScriptedGenerator>,
        judges: Vec<SlotJudge>,
        refiner_fails: bool,
        params: PlannerParams,
    ) -> RunPlanningUseCase {
        let judges: Vec<Arc<dyn PairwiseJudge>> = judges
            .into_iter()
            .map(|j| Arc::new(j) as Arc<dyn PairwiseJudge>)
            .collect();
        RunPlanningUseCase::new(
            generator,
            judges,
            Arc::new(StaticRefiner {
                fail: refiner_fails,
            }),
        )
        .with_params(params.with_sampling_seed(11))
    }

    fn request() -> TaskRequest {
        TaskRequest::new("Build a rate limiter")
    }

    /// Eight candidates under Schulze always give a 0.125 margin, below 0.15.
    fn non_converging() -> PlannerParams {
        PlannerParams::default()
            .with_consensus_method(ConsensusMethod::Schulze)
            .with_candidates_per_round(8)
            .with_judge_pairs_per_round(28)
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_decisive_round_converges() {
        let generator = Arc::new(ScriptedGenerator::default());
        let use_case = planner(
            generator,
            vec![SlotJudge::new(Preference::LowerSlot)],
            false,
            PlannerParams::default().with_candidates_per_round(2),
        );

        let response = use_case.execute(&request()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.termination, Termination::Converged);
        assert_eq!(response.rounds_completed, 1);
        assert_eq!(response.candidate.as_ref().unwrap().id, "r1-c0");
        assert!(response.margin >= 0.15);
        assert!((response.confidence - 1.0).abs() < 1e-9);
        assert!(!response.is_degraded());

        let plan = response.plan.unwrap();
        assert_eq!(plan.summary, "refined r1-c0");
        assert_eq!(plan.phases.len(), 3);
        assert!(plan.phases.iter().all(|p| p.agent_count >= 1));
        assert!(!response.gate_adjustments.is_empty());
    }

    #[tokio::test]
    async fn test_runs_until_max_rounds_keeping_best_ever() {
        let generator = Arc::new(ScriptedGenerator::default());
        let use_case = planner(
            Arc::clone(&generator),
            vec![SlotJudge::new(Preference::LowerSlot)],
            false,
            non_converging(),
        );

        let response = use_case.execute(&request()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.termination, Termination::MaxRounds);
        assert_eq!(response.rounds_completed, 3);
        assert!((response.margin - 0.125).abs() < 1e-9);
        // Later rounds tie the first, so the first winner stays.
        assert_eq!(response.candidate.as_ref().unwrap().id, "r1-c0");
        let expected = 0.5 + 0.5 * (0.125 / 0.15);
        assert!((response.confidence - expected).abs() < 1e-9);

        let seen = generator.seen();
        assert_eq!(seen.len(), 24);
        let round_one: Vec<_> = seen.iter().filter(|s| s.0 == 1).collect();
        assert!(round_one.iter().all(|s| s.3.is_none()));
        assert!(round_one.iter().any(|s| (s.2 - 0.2).abs() < 1e-9));
        assert!(round_one.iter().any(|s| (s.2 - 1.0).abs() < 1e-9));
        assert!(
            seen.iter()
                .filter(|s| s.0 == 2)
                .all(|s| s.3.as_deref() == Some("r1-c0"))
        );
    }

    #[tokio::test]
    async fn test_cyclic_judgments_do_not_converge() {
        let generator = Arc::new(ScriptedGenerator::default());
        let use_case = planner(
            generator,
            vec![SlotJudge::new(Preference::Cycle)],
            false,
            PlannerParams::default().with_candidates_per_round(3),
        );

        let response = use_case.execute(&request()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.termination, Termination::MaxRounds);
        assert!(response.margin < 0.15);
    }

    #[tokio::test]
    async fn test_zero_comparisons_falls_back_to_first_candidate() {
        let generator = Arc::new(ScriptedGenerator::default());
        let use_case = planner(
            generator,
            vec![SlotJudge::new(Preference::Fail)],
            false,
            PlannerParams::default().with_candidates_per_round(3),
        );

        let response = use_case.execute(&request()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.termination, Termination::NoComparisons);
        assert_eq!(response.rounds_completed, 1);
        assert_eq!(response.candidate.as_ref().unwrap().id, "r1-c0");
        assert!((response.confidence - FALLBACK_CONFIDENCE).abs() < 1e-9);
        assert_eq!(response.degradations, vec![Degradation::NoComparisons]);
        assert!(response.ranking.is_none());
    }

    #[tokio::test]
    async fn test_failing_judge_does_not_sink_round() {
        let generator = Arc::new(ScriptedGenerator::default());
        // Judge 0 gets pairs (0,1) and (1,2); judge 1 gets (0,2) and fails.
        let use_case = planner(
            generator,
            vec![
                SlotJudge::new(Preference::LowerSlot),
                SlotJudge::new(Preference::Fail),
            ],
            false,
            PlannerParams::default().with_candidates_per_round(3),
        );

        let response = use_case.execute(&request()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.termination, Termination::Converged);
        assert_eq!(response.rounds_completed, 1);
        assert_eq!(response.candidate.as_ref().unwrap().id, "r1-c0");
        assert!(response.ranking.is_some());
        assert!(response.degradations.is_empty());
    }

    #[tokio::test]
    async fn test_no_candidates_in_first_round_fails() {
        let generator = Arc::new(ScriptedGenerator::failing_in(&[1]));
        let use_case = planner(
            generator,
            vec![SlotJudge::new(Preference::LowerSlot)],
            false,
            PlannerParams::default(),
        );

        let response = use_case.execute(&request()).await.unwrap();

        assert!(!response.success);
        assert_eq!(response.termination, Termination::Failed);
        assert!(response.error.unwrap().contains("no candidates"));
        assert!(response.candidate.is_none());
        assert_eq!(response.rounds_completed, 1);
    }

    #[tokio::test]
    async fn test_empty_later_round_keeps_best() {
        let generator = Arc::new(ScriptedGenerator::failing_in(&[2]));
        let use_case = planner(
            generator,
            vec![SlotJudge::new(Preference::LowerSlot)],
            false,
            non_converging(),
        );

        let response = use_case.execute(&request()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.termination, Termination::NoCandidates);
        assert_eq!(response.rounds_completed, 2);
        assert_eq!(response.candidate.unwrap().id, "r1-c0");
    }

    #[tokio::test]
    async fn test_refinement_failure_degrades_confidence() {
        let generator = Arc::new(ScriptedGenerator::default());
        let use_case = planner(
            generator,
            vec![SlotJudge::new(Preference::LowerSlot)],
            true,
            PlannerParams::default().with_candidates_per_round(2),
        );

        let response = use_case.execute(&request()).await.unwrap();

        assert!(response.success);
        assert!(response.plan.is_none());
        assert_eq!(response.candidate.unwrap().id, "r1-c0");
        assert!((response.confidence - REFINEMENT_FAILURE_PENALTY).abs() < 1e-9);
        assert!(matches!(
            response.degradations.as_slice(),
            [Degradation::RefinementFailed(_)]
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_stops_between_rounds() {
        let generator = Arc::new(ScriptedGenerator::slow(Duration::from_secs(200)));
        let use_case = planner(
            generator,
            vec![SlotJudge::new(Preference::LowerSlot)],
            false,
            non_converging()
                .with_max_rounds(10)
                .with_time_budget_seconds(300.0),
        );

        let response = use_case.execute(&request()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.termination, Termination::Deadline);
        assert_eq!(response.rounds_completed, 2);
    }

    #[tokio::test]
    async fn test_cost_budget_stops_loop() {
        let generator = Arc::new(ScriptedGenerator::default());
        let judge = SlotJudge {
            preference: Preference::LowerSlot,
            usage: Some(TokenUsage::new("local-model", 0, 100_000)),
        };
        let use_case = planner(generator, vec![judge], false, non_converging().with_max_rounds(5))
            .with_cost_budget(0.01);

        let response = use_case.execute(&request()).await.unwrap();

        assert!(response.success);
        assert_eq!(response.termination, Termination::CostBudget);
        assert_eq!(response.rounds_completed, 1);
        assert!(response.cost.total_cost > 0.01);
    }

    #[tokio::test]
    async fn test_judges_assigned_round_robin() {
        let generator = Arc::new(ScriptedGenerator::default());
        let use_case = planner(
            generator,
            vec![
                SlotJudge::new(Preference::LowerSlot),
                SlotJudge::new(Preference::LowerSlot),
            ],
            false,
            PlannerParams::default()
                .with_candidates_per_round(3)
                .with_reliability_weighting(true),
        );

        let response = use_case.execute(&request()).await.unwrap();
        assert_eq!(response.termination, Termination::Converged);

        // Pairs (0,1) and (1,2) go to judge 0, (0,2) to judge 1; all agree.
        let reliability = use_case.reliability();
        assert!((reliability.accuracies()[0] - 0.75).abs() < 1e-9);
        assert!((reliability.accuracies()[1] - 2.0 / 3.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_rubric_score_attached() {
        let generator = Arc::new(ScriptedGenerator::default());
        let use_case = planner(
            generator,
            vec![SlotJudge::new(Preference::LowerSlot)],
            false,
            PlannerParams::default().with_candidates_per_round(2),
        )
        .with_rubric_judge(Arc::new(FixedRubric));

        let response = use_case.execute(&request()).await.unwrap();
        assert_eq!(response.rubric_score, Some(0.7));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_round() {
        let token = CancellationToken::new();
        token.cancel();
        let generator = Arc::new(ScriptedGenerator::default());
        let use_case = planner(
            Arc::clone(&generator),
            vec![SlotJudge::new(Preference::LowerSlot)],
            false,
            PlannerParams::default(),
        )
        .with_cancellation(token);

        let response = use_case.execute(&request()).await.unwrap();

        assert!(!response.success);
        assert_eq!(response.termination, Termination::Cancelled);
        assert!(generator.seen().is_empty());
    }

    #[tokio::test]
    async fn test_rejects_invalid_setup() {
        let generator = Arc::new(ScriptedGenerator::default());
        let no_judges = RunPlanningUseCase::new(
            generator.clone(),
            Vec::new(),
            Arc::new(StaticRefiner { fail: false }),
        );
        assert_eq!(
            no_judges.execute(&request()).await.unwrap_err(),
            PlanningError::NoJudges
        );

        let zero_rounds = planner(
            generator,
            vec![SlotJudge::new(Preference::LowerSlot)],
            false,
            PlannerParams::default().with_max_rounds(0),
        );
        assert!(matches!(
            zero_rounds.execute(&request()).await,
            Err(PlanningError::InvalidParams(_))
        ));
        assert_eq!(
            zero_rounds.execute(&TaskRequest::new("")).await.unwrap_err(),
            PlanningError::EmptyRequest
        );
    }

    #[test]
    fn test_aggregated_confidence() {
        assert!((aggregated_confidence(0.0, 0.15) - 0.5).abs() < 1e-12);
        assert!((aggregated_confidence(0.075, 0.15) - 0.75).abs() < 1e-12);
        assert!((aggregated_confidence(0.9, 0.15) - 1.0).abs() < 1e-12);
        assert!((aggregated_confidence(0.1, 0.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pair_judgments_labels() {
        let raw = vec![RawComparison::new(0, 2, 0), RawComparison::new(2, 0, 1)];
        let judgments = pair_judgments(&raw, 3);
        assert_eq!(judgments[0], Judgment::new(0, 2, 0));
        assert_eq!(judgments[1], Judgment::new(1, 2, 1));
    }
}
