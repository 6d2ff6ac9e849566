use crate::core::candidate::RawComparison;
use crate::ranking::{ConsensusMethod, Pairwise, RankAggregator, RankingResult};
use crate::reliability::JudgeReliability;
use std::collections::HashMap;

/// Margin at which a round is considered decisive.
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.15;

/// `margin >= threshold`
pub fn should_converge(margin: f64, threshold: f64) -> bool {
    margin >= threshold
}

/// Ranks one round's candidates with a fixed aggregation method.
///
/// # Example
///
/// ```
/// use planner_domain::consensus::ConsensusEngine;
/// use planner_domain::core::candidate::RawComparison;
/// use planner_domain::ranking::ConsensusMethod;
///
/// let engine = ConsensusEngine::new(ConsensusMethod::Btl);
/// let ids = vec!["a".to_string(), "b".to_string()];
/// let result = engine.rank_candidates(&[RawComparison::new(1, 0, 0)], &ids);
/// assert_eq!(result.top(), Some("b"));
/// ```
pub struct ConsensusEngine {
    aggregator: Box<dyn RankAggregator>,
    threshold: f64,
}

impl ConsensusEngine {
    pub fn new(method: ConsensusMethod) -> Self {
        Self::with_aggregator(method.aggregator())
    }

    /// Use a custom aggregator implementation.
    pub fn with_aggregator(aggregator: Box<dyn RankAggregator>) -> Self {
        Self {
            aggregator,
            threshold: DEFAULT_CONVERGENCE_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn method(&self) -> ConsensusMethod {
        self.aggregator.method()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Whether `margin` clears the configured threshold.
    pub fn converged(&self, margin: f64) -> bool {
        should_converge(margin, self.threshold)
    }

    /// Rank `ids` from unweighted comparisons.
    ///
    /// Zero or one candidate short-circuits without running any algorithm.
    /// Out-of-range indices are dropped.
    pub fn rank_candidates(&self, comparisons: &[RawComparison], ids: &[String]) -> RankingResult {
        if let Some(short) = short_circuit(ids) {
            return short;
        }
        let pairwise = Pairwise::from_comparisons(ids.len(), comparisons);
        self.rank_pairwise(&pairwise, ids)
    }

    /// Rank `ids`, weighting each comparison by its judge's estimated accuracy.
    pub fn rank_candidates_weighted(
        &self,
        comparisons: &[RawComparison],
        ids: &[String],
        reliability: &JudgeReliability,
    ) -> RankingResult {
        if let Some(short) = short_circuit(ids) {
            return short;
        }
        let pairwise =
            Pairwise::from_weighted(ids.len(), comparisons, |judge| reliability.weight_for(judge));
        self.rank_pairwise(&pairwise, ids)
    }

    /// Rank an already-built pairwise structure.
    pub fn rank_pairwise(&self, pairwise: &Pairwise, ids: &[String]) -> RankingResult {
        if let Some(short) = short_circuit(ids) {
            return short;
        }
        let (order, scores) = self.aggregator.aggregate(pairwise).into_order_and_scores();

        let ranked_ids: Vec<String> = order
            .iter()
            .filter_map(|&idx| ids.get(idx).cloned())
            .collect();
        let scores: HashMap<String, f64> = ids
            .iter()
            .cloned()
            .zip(scores.iter().copied())
            .collect();

        let top_margin = match (order.first(), order.get(1)) {
            (Some(&first), Some(&second)) => {
                let a = scores_at(&scores, ids, first);
                let b = scores_at(&scores, ids, second);
                a - b
            }
            _ => 0.0,
        };

        RankingResult {
            ranked_ids,
            scores,
            top_margin,
        }
    }
}

impl Default for ConsensusEngine {
    fn default() -> Self {
        Self::new(ConsensusMethod::default())
    }
}

impl std::fmt::Debug for ConsensusEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsensusEngine")
            .field("method", &self.method())
            .field("threshold", &self.threshold)
            .finish()
    }
}

fn short_circuit(ids: &[String]) -> Option<RankingResult> {
    match ids {
        [] => Some(RankingResult::default()),
        [only] => Some(RankingResult::singleton(only.clone())),
        _ => None,
    }
}

fn scores_at(scores: &HashMap<String, f64>, ids: &[String], idx: usize) -> f64 {
    ids.get(idx)
        .and_then(|id| scores.get(id))
        .copied()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reliability::Judgment;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn repeated(winner: usize, loser: usize, times: usize) -> Vec<RawComparison> {
        (0..times)
            .map(|k| RawComparison::new(winner, loser, k % 3))
            .collect()
    }

    #[test]
    fn test_btl_orders_a_b_c() {
        let mut raw = repeated(0, 1, 5);
        raw.extend(repeated(1, 2, 5));
        raw.extend(repeated(0, 2, 5));

        let engine = ConsensusEngine::new(ConsensusMethod::Btl);
        let result = engine.rank_candidates(&raw, &ids(&["A", "B", "C"]));

        assert_eq!(result.ranked_ids, ids(&["A", "B", "C"]));
        let total: f64 = result.scores.values().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(result.top_margin > 0.0);
    }

    #[test]
    fn test_single_candidate_for_every_method() {
        for method in ConsensusMethod::ALL {
            let engine = ConsensusEngine::new(method);
            let result = engine.rank_candidates(&[RawComparison::new(0, 3, 0)], &ids(&["solo"]));
            assert_eq!(result.ranked_ids, ids(&["solo"]));
            assert_eq!(result.score_of("solo"), Some(1.0));
            assert_eq!(result.top_margin, 1.0);
        }
    }

    #[test]
    fn test_no_candidates() {
        let engine = ConsensusEngine::default();
        let result = engine.rank_candidates(&[], &[]);
        assert!(result.ranked_ids.is_empty());
        assert_eq!(result.top_margin, 0.0);
    }

    #[test]
    fn test_out_of_range_index_ignored() {
        for method in ConsensusMethod::ALL {
            let engine = ConsensusEngine::new(method);
            let raw = vec![RawComparison::new(99, 0, 1), RawComparison::new(2, 1, 0)];
            let result = engine.rank_candidates(&raw, &ids(&["x", "y", "z"]));
            assert_eq!(result.ranked_ids.len(), 3);
        }
    }

    #[test]
    fn test_schulze_proxy_scores_and_margin() {
        let engine = ConsensusEngine::new(ConsensusMethod::Schulze);
        let raw = vec![RawComparison::new(1, 0, 0), RawComparison::new(1, 2, 0)];
        let result = engine.rank_candidates(&raw, &ids(&["x", "y", "z"]));
        assert_eq!(result.top(), Some("y"));
        assert!((result.top_score() - 1.0).abs() < 1e-12);
        assert!((result.top_margin - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_rank_centrality_sums_to_one() {
        let engine = ConsensusEngine::new(ConsensusMethod::RankCentrality);
        let raw = vec![
            RawComparison::new(0, 1, 0),
            RawComparison::new(1, 2, 0),
            RawComparison::new(2, 1, 1),
            RawComparison::new(0, 2, 1),
        ];
        let result = engine.rank_candidates(&raw, &ids(&["a", "b", "c"]));
        let total: f64 = result.scores.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert_eq!(result.top(), Some("a"));
    }

    #[test]
    fn test_weighted_ranking_discounts_unreliable_judge() {
        let mut reliability = JudgeReliability::new(3, 2);
        // Judge 2 always disagrees with judges 0 and 1.
        let history: Vec<Judgment> = (0..10)
            .flat_map(|item| {
                [
                    Judgment::new(0, item, 0),
                    Judgment::new(1, item, 0),
                    Judgment::new(2, item, 1),
                ]
            })
            .collect();
        reliability.update_reliability(&history);

        // Unweighted, the unreliable judge's two votes for "b" win 2:1.
        let raw = vec![
            RawComparison::new(0, 1, 0),
            RawComparison::new(1, 0, 2),
            RawComparison::new(1, 0, 2),
        ];
        let engine = ConsensusEngine::new(ConsensusMethod::Btl);
        let plain = engine.rank_candidates(&raw, &ids(&["a", "b"]));
        assert_eq!(plain.top(), Some("b"));

        let weighted = engine.rank_candidates_weighted(&raw, &ids(&["a", "b"]), &reliability);
        assert_eq!(weighted.top(), Some("a"));
    }

    #[test]
    fn test_should_converge() {
        assert!(should_converge(0.20, 0.15));
        assert!(should_converge(0.15, 0.15));
        assert!(!should_converge(0.10, 0.15));

        let engine = ConsensusEngine::default().with_threshold(0.3);
        assert!(!engine.converged(0.2));
    }
}
