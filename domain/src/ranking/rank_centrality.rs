//! RankCentrality: spectral ranking from a comparison random walk.
//!
//! The walk moves from `i` toward `j` in proportion to how often `j` beat `i`,
//! so probability mass accumulates on candidates that win. The stationary
//! distribution of the walk is the score vector.

use super::pairwise::Pairwise;

const MAX_ITERATIONS: usize = 200;
const TOLERANCE: f64 = 1e-12;

/// Build the row-stochastic transition matrix.
///
/// `P[i][j] = w_ji / (w_ij + w_ji)` for observed pairs, then each row is
/// normalized. A row with no mass (isolated candidate) becomes a self-loop.
pub fn transition_matrix(pairwise: &Pairwise) -> Vec<Vec<f64>> {
    let n = pairwise.n();
    let mut p = vec![vec![0.0; n]; n];

    for (i, j) in pairwise.observed_pairs() {
        let w_ij = pairwise.wins(i, j);
        let w_ji = pairwise.wins(j, i);
        let total = w_ij + w_ji;
        if total <= 0.0 {
            continue;
        }
        // Loser hands mass to the winner.
        p[i][j] = w_ji / total;
        p[j][i] = w_ij / total;
    }

    for (i, row) in p.iter_mut().enumerate() {
        let sum: f64 = row.iter().sum();
        if sum > 0.0 {
            row.iter_mut().for_each(|v| *v /= sum);
        } else {
            row[i] = 1.0;
        }
    }
    p
}

/// Stationary distribution of [`transition_matrix`], summing to 1.
pub fn rank_centrality(pairwise: &Pairwise) -> Vec<f64> {
    let n = pairwise.n();
    if n == 0 {
        return Vec::new();
    }
    let p = transition_matrix(pairwise);
    let mut pi = vec![1.0 / n as f64; n];

    for _ in 0..MAX_ITERATIONS {
        let mut next = vec![0.0; n];
        for (i, row) in p.iter().enumerate() {
            let mass = pi[i];
            if mass == 0.0 {
                continue;
            }
            for (j, &prob) in row.iter().enumerate() {
                next[j] += mass * prob;
            }
        }
        let delta: f64 = next.iter().zip(&pi).map(|(a, b)| (a - b).abs()).sum();
        pi = next;
        if delta < TOLERANCE {
            break;
        }
    }

    let total: f64 = pi.iter().sum();
    if total > 0.0 {
        pi.iter_mut().for_each(|v| *v /= total);
    }
    pi
}
