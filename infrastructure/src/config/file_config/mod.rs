//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Every section is `#[serde(default)]`, so a partial file is always valid
//! TOML-wise; semantic problems are reported by [`FileConfig::validate`].

mod budget;
mod logging;
mod planner;
mod triage;

pub use budget::FileBudgetConfig;
pub use logging::FileLoggingConfig;
pub use planner::FilePlannerConfig;
pub use triage::FileTriageConfig;

use crate::logging::LoggingConfig;
use planner_application::config::PlannerConfig;
use planner_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Multi-round loop settings
    pub planner: FilePlannerConfig,
    /// Triage gate settings
    pub triage: FileTriageConfig,
    /// Cost ceiling
    pub budget: FileBudgetConfig,
    /// Diagnostics and event log output
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.to_configs().2
    }

    /// Convert to the application config and the logging config.
    ///
    /// Values that can be corrected are corrected and reported as warnings;
    /// the returned issues may still contain errors, check with
    /// [`ConfigIssue::has_errors`].
    pub fn to_configs(&self) -> (PlannerConfig, LoggingConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let (planner, planner_issues) = self.planner.to_params();
        issues.extend(planner_issues);
        let (triage, triage_issues) = self.triage.to_params();
        issues.extend(triage_issues);
        let (budget, budget_issues) = self.budget.to_params();
        issues.extend(budget_issues);
        let (logging, logging_issues) = self.logging.to_logging_config();
        issues.extend(logging_issues);

        (PlannerConfig::new(planner, triage, budget), logging, issues)
    }
}
