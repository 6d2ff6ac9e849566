//! Infrastructure layer for swarm-planner
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod vocabulary;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileBudgetConfig, FileConfig, FileLoggingConfig,
    FilePlannerConfig, FileTriageConfig, LoadedConfig,
};
pub use logging::{JsonlPlanningLogger, LoggingConfig, LoggingError, init_tracing};
pub use vocabulary::StaticVocabulary;
