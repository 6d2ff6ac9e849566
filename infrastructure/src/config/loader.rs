//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use crate::logging::LoggingConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use planner_application::config::PlannerConfig;
use planner_domain::{ConfigIssue, Severity};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Project-level config file names, checked in order.
const PROJECT_CONFIG_FILES: [&str; 2] = ["planner.toml", ".planner.toml"];

/// Prefix of environment overrides, e.g. `PLANNER_PLANNER__MAX_ROUNDS=5`.
pub const ENV_PREFIX: &str = "PLANNER_";

/// Errors that can occur while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {}", describe(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn describe(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .map(|i| i.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Fully converted configuration, ready for the use cases.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub planner: PlannerConfig,
    pub logging: LoggingConfig,
    /// Non-fatal issues found while converting
    pub warnings: Vec<ConfigIssue>,
}

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `PLANNER_` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./planner.toml` or `./.planner.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/swarm-planner/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        Self::figment(config_path)
            .extract()
            .map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Load, convert and validate in one step.
    ///
    /// Any error-severity issue fails the load; warnings are logged and
    /// returned alongside the config.
    pub fn load_planner_config(config_path: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
        let file_config = Self::load(config_path)?;
        let (planner, logging, issues) = file_config.to_configs();
        if ConfigIssue::has_errors(&issues) {
            return Err(ConfigError::Invalid(issues));
        }
        for issue in &issues {
            warn!("{}", issue.message);
        }
        Ok(LoadedConfig {
            planner,
            logging,
            warnings: issues,
        })
    }

    /// Load only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// The merged figment before extraction
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/swarm-planner/config.toml if set,
    /// otherwise the platform config directory.
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("swarm-planner").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}
