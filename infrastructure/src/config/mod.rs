//! Configuration file loading for swarm-planner
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PLANNER_` environment variables
//! 2. Explicitly passed config file
//! 3. Project root: `./planner.toml` or `./.planner.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/swarm-planner/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    FileBudgetConfig, FileConfig, FileLoggingConfig, FilePlannerConfig, FileTriageConfig,
};
pub use loader::{ConfigError, ConfigLoader, ENV_PREFIX, LoadedConfig};
