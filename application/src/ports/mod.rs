//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod collaborator;
pub mod planning_logger;
pub mod progress;
pub mod vocabulary;
