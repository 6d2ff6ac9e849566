//! Core domain concepts shared across all subdomains.
//!
//! - [`candidate::Candidate`]: an opaque plan candidate
//! - [`candidate::PairwiseComparison`]: a judged comparison between two candidates
//! - [`error::DomainError`]: domain-level errors
//! - [`validation::ConfigIssue`]: structured configuration problems

pub mod candidate;
pub mod error;
pub mod validation;
