//! Choosing which candidate pairs get judged in a round.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Mutex;

/// All unordered pairs `(i, j)` with `i < j < n`, in lexicographic order.
pub fn all_pairs(n: usize) -> Vec<(usize, usize)> {
    (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect()
}

/// Picks at most `budget` unordered pairs out of `n` candidates.
///
/// The uniform baseline is [`UniformPairSelector`]; smarter selectors (for
/// example ones that favour pairs the current ranking is unsure about) plug
/// in here.
pub trait PairSelector: Send + Sync {
    fn select(&self, n: usize, budget: usize) -> Vec<(usize, usize)>;
}

/// Every pair when the budget allows, otherwise a uniform random subset.
pub struct UniformPairSelector {
    rng: Mutex<StdRng>,
}

impl UniformPairSelector {
    /// Seeded for reproducible sampling, or from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl Default for UniformPairSelector {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PairSelector for UniformPairSelector {
    fn select(&self, n: usize, budget: usize) -> Vec<(usize, usize)> {
        let pairs = all_pairs(n);
        if pairs.len() <= budget {
            return pairs;
        }
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let mut chosen: Vec<(usize, usize)> = pairs
            .choose_multiple(&mut *rng, budget)
            .copied()
            .collect();
        chosen.sort_unstable();
        chosen
    }
}
