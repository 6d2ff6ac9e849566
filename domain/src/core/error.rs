//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("No candidates produced")]
    NoCandidates,

    #[error("Unknown consensus method: {0}")]
    UnknownConsensusMethod(String),

    #[error("Unknown escalation rule: {0}")]
    UnknownEscalationRule(String),

    #[error("Invalid triage decision: {0}")]
    InvalidDecision(String),

    #[error("Candidate index {index} out of range for {count} candidates")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(DomainError::NoCandidates.to_string(), "No candidates produced");
        assert_eq!(
            DomainError::IndexOutOfRange { index: 9, count: 3 }.to_string(),
            "Candidate index 9 out of range for 3 candidates"
        );
    }
}
