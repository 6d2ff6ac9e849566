//! Common interface over the rank aggregation algorithms.

use super::btl::{BtlParams, bradley_terry};
use super::method::ConsensusMethod;
use super::pairwise::Pairwise;
use super::rank_centrality::rank_centrality;
use super::schulze::schulze_method;

/// Raw output of an aggregation algorithm.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregate {
    /// One score per candidate index, summing to 1.
    Scores(Vec<f64>),
    /// Candidate indices, best first.
    Order(Vec<usize>),
}

impl Aggregate {
    /// Normalize into `(order, scores)` indexed by candidate.
    ///
    /// Score ties keep ascending index order. An explicit order gets the
    /// rank-derived proxy score `(n - position) / n`.
    pub fn into_order_and_scores(self) -> (Vec<usize>, Vec<f64>) {
        match self {
            Aggregate::Scores(scores) => {
                let mut order: Vec<usize> = (0..scores.len()).collect();
                order.sort_by(|&a, &b| {
                    scores[b]
                        .partial_cmp(&scores[a])
                        .unwrap_or(std::cmp::Ordering::Equal)
                        .then(a.cmp(&b))
                });
                (order, scores)
            }
            Aggregate::Order(order) => {
                let n = order.len();
                let mut scores = vec![0.0; n];
                for (position, &idx) in order.iter().enumerate() {
                    if idx < n {
                        scores[idx] = (n - position) as f64 / n as f64;
                    }
                }
                (order, scores)
            }
        }
    }
}

/// A rank aggregation algorithm.
pub trait RankAggregator: Send + Sync {
    /// The method this aggregator implements.
    fn method(&self) -> ConsensusMethod;

    /// Aggregate the round's comparisons.
    fn aggregate(&self, pairwise: &Pairwise) -> Aggregate;
}

/// Bradley-Terry-Luce skills.
#[derive(Debug, Clone, Default)]
pub struct BtlAggregator {
    pub params: BtlParams,
}

impl RankAggregator for BtlAggregator {
    fn method(&self) -> ConsensusMethod {
        ConsensusMethod::Btl
    }

    fn aggregate(&self, pairwise: &Pairwise) -> Aggregate {
        Aggregate::Scores(bradley_terry(pairwise, self.params))
    }
}

/// RankCentrality stationary distribution.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankCentralityAggregator;

impl RankAggregator for RankCentralityAggregator {
    fn method(&self) -> ConsensusMethod {
        ConsensusMethod::RankCentrality
    }

    fn aggregate(&self, pairwise: &Pairwise) -> Aggregate {
        Aggregate::Scores(rank_centrality(pairwise))
    }
}

/// Schulze strongest-path ordering.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchulzeAggregator;

impl RankAggregator for SchulzeAggregator {
    fn method(&self) -> ConsensusMethod {
        ConsensusMethod::Schulze
    }

    fn aggregate(&self, pairwise: &Pairwise) -> Aggregate {
        Aggregate::Order(schulze_method(pairwise))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_sorted_with_index_tiebreak() {
        let (order, scores) = Aggregate::Scores(vec![0.2, 0.4, 0.2, 0.2]).into_order_and_scores();
        assert_eq!(order, vec![1, 0, 2, 3]);
        assert_eq!(scores[1], 0.4);
    }

    #[test]
    fn test_order_proxy_scores() {
        let (order, scores) = Aggregate::Order(vec![2, 0, 1]).into_order_and_scores();
        assert_eq!(order, vec![2, 0, 1]);
        assert!((scores[2] - 1.0).abs() < 1e-12);
        assert!((scores[0] - 2.0 / 3.0).abs() < 1e-12);
        assert!((scores[1] - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_method_builds_matching_aggregator() {
        for method in ConsensusMethod::ALL {
            assert_eq!(method.aggregator().method(), method);
        }
    }
}
