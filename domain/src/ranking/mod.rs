//! Rank aggregation over pairwise judgments.
//!
//! Every round's judgments are folded into a [`Pairwise`] win-count structure
//! and handed to one of three interchangeable algorithms:
//!
//! | Method | Output | Scores |
//! |--------|--------|--------|
//! | [`ConsensusMethod::Btl`] | skill vector | sum to 1 |
//! | [`ConsensusMethod::RankCentrality`] | stationary distribution | sum to 1 |
//! | [`ConsensusMethod::Schulze`] | total order | rank proxy |

pub mod aggregator;
pub mod btl;
pub mod method;
pub mod pairwise;
pub mod rank_centrality;
pub mod result;
pub mod schulze;

pub use aggregator::{
    Aggregate, BtlAggregator, RankAggregator, RankCentralityAggregator, SchulzeAggregator,
};
pub use btl::{BtlParams, bradley_terry};
pub use method::ConsensusMethod;
pub use pairwise::Pairwise;
pub use rank_centrality::{rank_centrality, transition_matrix};
pub use result::RankingResult;
pub use schulze::{schulze_method, strongest_paths};
