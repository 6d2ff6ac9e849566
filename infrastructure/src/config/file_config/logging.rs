//! Logging configuration from TOML (`[logging]` section)

use crate::logging::LoggingConfig;
use planner_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// level = "info"                      # any EnvFilter directive
/// ansi = true
/// show_target = false
/// file = "logs/planner.log"           # optional, rotated daily
/// events_file = "logs/planner.jsonl"  # optional planning event log
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub level: String,
    pub ansi: bool,
    pub show_target: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events_file: Option<PathBuf>,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            ansi: true,
            show_target: false,
            file: None,
            events_file: None,
        }
    }
}

impl FileLoggingConfig {
    /// Convert to [`LoggingConfig`], falling back to "warn" for a bad directive.
    pub fn to_logging_config(&self) -> (LoggingConfig, Vec<ConfigIssue>) {
        let mut issues = Vec::new();
        let level = match EnvFilter::try_new(&self.level) {
            Ok(_) => self.level.clone(),
            Err(e) => {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "logging.level".to_string(),
                        value: self.level.clone(),
                        valid_values: ["trace", "debug", "info", "warn", "error"]
                            .iter()
                            .map(|s| s.to_string())
                            .collect(),
                    },
                    format!(
                        "logging.level: invalid filter '{}' ({}), falling back to 'warn'",
                        self.level, e
                    ),
                ));
                "warn".to_string()
            }
        };

        let config = LoggingConfig {
            level,
            ansi: self.ansi,
            show_target: self.show_target,
            file: self.file.clone(),
            events_file: self.events_file.clone(),
        };
        (config, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_deserialize() {
        let toml_str = r#"
level = "planner_application=debug,info"
ansi = false
file = "/tmp/planner.log"
"#;
        let config: FileLoggingConfig = toml::from_str(toml_str).unwrap();
        let (logging, issues) = config.to_logging_config();
        assert!(issues.is_empty());
        assert_eq!(logging.level, "planner_application=debug,info");
        assert!(!logging.ansi);
        assert_eq!(logging.file, Some(PathBuf::from("/tmp/planner.log")));
        assert!(logging.events_file.is_none());
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let config = FileLoggingConfig {
            level: "planner=loud".to_string(),
            ..Default::default()
        };
        let (logging, issues) = config.to_logging_config();
        assert_eq!(logging.level, "warn");
        assert_eq!(issues.len(), 1);
    }
}
