//! Judge reliability estimation.
//!
//! [`JudgeReliability`] runs Dawid-Skene style EM over `(judge, item, label)`
//! triples and yields one accuracy per judge. The accuracies can weight a
//! judge's observations when building a [`Pairwise`](crate::ranking::Pairwise);
//! see [`ConsensusEngine::rank_candidates_weighted`](crate::consensus::ConsensusEngine::rank_candidates_weighted).

mod dawid_skene;

pub use dawid_skene::{JudgeReliability, Judgment, MAX_JUDGES, PRIOR_ACCURACY};
