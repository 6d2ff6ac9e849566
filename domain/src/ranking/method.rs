//! Consensus method selection.

use super::aggregator::{
    BtlAggregator, RankAggregator, RankCentralityAggregator, SchulzeAggregator,
};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Which rank aggregation algorithm a planner uses.
///
/// Chosen once per planner instance; the engine never re-dispatches per call.
///
/// # Example
///
/// ```
/// use planner_domain::ranking::ConsensusMethod;
///
/// let method: ConsensusMethod = "rank-centrality".parse().unwrap();
/// assert_eq!(method, ConsensusMethod::RankCentrality);
/// assert_eq!(ConsensusMethod::default(), ConsensusMethod::Btl);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusMethod {
    /// Bradley-Terry-Luce via minorization-maximization
    #[default]
    Btl,
    /// Stationary distribution of the comparison random walk
    RankCentrality,
    /// Condorcet ordering via strongest paths
    Schulze,
}

impl ConsensusMethod {
    pub const ALL: [ConsensusMethod; 3] = [
        ConsensusMethod::Btl,
        ConsensusMethod::RankCentrality,
        ConsensusMethod::Schulze,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusMethod::Btl => "btl",
            ConsensusMethod::RankCentrality => "rank_centrality",
            ConsensusMethod::Schulze => "schulze",
        }
    }

    /// Build the aggregator implementing this method.
    pub fn aggregator(&self) -> Box<dyn RankAggregator> {
        match self {
            ConsensusMethod::Btl => Box::new(BtlAggregator::default()),
            ConsensusMethod::RankCentrality => Box::new(RankCentralityAggregator),
            ConsensusMethod::Schulze => Box::new(SchulzeAggregator),
        }
    }
}

impl std::fmt::Display for ConsensusMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConsensusMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "btl" | "bradley_terry" => Ok(ConsensusMethod::Btl),
            "rank_centrality" | "rankcentrality" => Ok(ConsensusMethod::RankCentrality),
            "schulze" => Ok(ConsensusMethod::Schulze),
            _ => Err(DomainError::UnknownConsensusMethod(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method() {
        assert_eq!("BTL".parse::<ConsensusMethod>().ok(), Some(ConsensusMethod::Btl));
        assert_eq!(
            "rank_centrality".parse::<ConsensusMethod>().ok(),
            Some(ConsensusMethod::RankCentrality)
        );
        assert_eq!(
            "Schulze".parse::<ConsensusMethod>().ok(),
            Some(ConsensusMethod::Schulze)
        );
        assert!("borda".parse::<ConsensusMethod>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for method in ConsensusMethod::ALL {
            assert_eq!(method.to_string().parse::<ConsensusMethod>().ok(), Some(method));
        }
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&ConsensusMethod::RankCentrality).unwrap();
        assert_eq!(json, "\"rank_centrality\"");
    }
}
