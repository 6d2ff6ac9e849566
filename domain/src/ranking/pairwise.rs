//! Pairwise win counts between candidates of a single round.

use crate::core::candidate::RawComparison;
use std::collections::{BTreeMap, BTreeSet};

/// Win counts between dense candidate indices `[0, n)`.
///
/// `wins(i, j)` and `wins(j, i)` are independent counters: observations in both
/// directions mean the judges disagreed. Built once per round and never mutated
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pairwise {
    wins: BTreeMap<(usize, usize), f64>,
    n: usize,
}

impl Pairwise {
    /// Count `wins[(winner, loser)] += 1` for every in-range triple.
    ///
    /// Out-of-range indices and self-comparisons are dropped silently.
    pub fn from_comparisons(n: usize, comparisons: &[RawComparison]) -> Self {
        Self::from_weighted(n, comparisons, |_| 1.0)
    }

    /// Like [`Pairwise::from_comparisons`], but each observation adds
    /// `weight(judge_id)` instead of 1. Negative or non-finite weights count as 0.
    pub fn from_weighted<F>(n: usize, comparisons: &[RawComparison], weight: F) -> Self
    where
        F: Fn(usize) -> f64,
    {
        let mut wins = BTreeMap::new();
        for c in comparisons {
            if c.winner >= n || c.loser >= n || c.winner == c.loser {
                continue;
            }
            let w = weight(c.judge_id);
            let w = if w.is_finite() && w > 0.0 { w } else { 0.0 };
            *wins.entry((c.winner, c.loser)).or_insert(0.0) += w;
        }
        Self { wins, n }
    }

    /// Number of candidates.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Number of times `i` beat `j` (0 when never observed).
    pub fn wins(&self, i: usize, j: usize) -> f64 {
        self.wins.get(&(i, j)).copied().unwrap_or(0.0)
    }

    /// Unordered pairs `(i, j)` with `i < j` that have at least one
    /// observation in either direction, in ascending order.
    pub fn observed_pairs(&self) -> Vec<(usize, usize)> {
        self.wins
            .keys()
            .map(|&(i, j)| if i < j { (i, j) } else { (j, i) })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// True when no comparison was recorded.
    pub fn is_empty(&self) -> bool {
        self.wins.is_empty()
    }
}
