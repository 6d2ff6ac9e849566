//! Bradley-Terry-Luce skill estimation via minorization-maximization.
//!
//! Under the model `P(i beats j) = s_i / (s_i + s_j)`. Each sweep applies the
//! MM fixed point
//!
//! ```text
//! s_i <- W_i / Σ_j (w_ij + w_ji) / (s_i + s_j)
//! ```
//!
//! which increases the log-likelihood monotonically. Candidates that never
//! won are clipped to `TINY` instead of collapsing to zero.

use super::pairwise::Pairwise;

/// Guard against division by zero for candidates with no wins.
const TINY: f64 = 1e-9;

/// Iteration controls for [`bradley_terry`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BtlParams {
    /// Maximum MM sweeps.
    pub iters: usize,
    /// Stop once the L1 change in skills drops below this.
    pub eps: f64,
}

impl Default for BtlParams {
    fn default() -> Self {
        Self {
            iters: 200,
            eps: 1e-6,
        }
    }
}

/// Estimate a skill vector summing to 1.
///
/// Returns an empty vector for `n == 0` and `[1.0]` for `n == 1`.
pub fn bradley_terry(pairwise: &Pairwise, params: BtlParams) -> Vec<f64> {
    let n = pairwise.n();
    if n == 0 {
        return Vec::new();
    }
    let mut skills = vec![1.0 / n as f64; n];
    let pairs = pairwise.observed_pairs();
    if pairs.is_empty() {
        return skills;
    }

    for _ in 0..params.iters {
        let mut numer = vec![0.0; n];
        let mut denom = vec![0.0; n];

        for &(i, j) in &pairs {
            let w_ij = pairwise.wins(i, j);
            let w_ji = pairwise.wins(j, i);
            numer[i] += w_ij;
            numer[j] += w_ji;
            let games = (w_ij + w_ji) / (skills[i] + skills[j] + TINY);
            denom[i] += games;
            denom[j] += games;
        }

        let mut next: Vec<f64> = numer
            .iter()
            .zip(&denom)
            .map(|(&num, &den)| if den > 0.0 { (num / den).max(TINY) } else { TINY })
            .collect();
        let total: f64 = next.iter().sum();
        if total <= 0.0 || !total.is_finite() {
            break;
        }
        next.iter_mut().for_each(|s| *s /= total);

        let delta: f64 = next.iter().zip(&skills).map(|(a, b)| (a - b).abs()).sum();
        skills = next;
        if delta < params.eps {
            break;
        }
    }

    skills
}
