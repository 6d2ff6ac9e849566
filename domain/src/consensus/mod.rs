//! Consensus facade: raw judgments in, ranking out.
//!
//! [`ConsensusEngine`] converts `(winner, loser, judge)` triples into a
//! [`Pairwise`](crate::ranking::Pairwise), dispatches to the aggregator picked
//! at construction and reports the top margin used as the convergence signal.

mod engine;

pub use engine::{ConsensusEngine, DEFAULT_CONVERGENCE_THRESHOLD, should_converge};
