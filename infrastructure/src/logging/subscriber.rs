//! `tracing` subscriber setup.
//!
//! Nothing is installed at import time; the caller decides when (and
//! whether) to call [`init_tracing`].

use std::path::PathBuf;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the subscriber
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Log file path has no file name: {0}")]
    InvalidFile(PathBuf),

    #[error("Could not create log directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Resolved logging settings
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. "info" or "planner_application=debug,warn"
    pub level: String,
    pub ansi: bool,
    pub show_target: bool,
    /// Daily-rotated diagnostic log file instead of stderr
    pub file: Option<PathBuf>,
    /// JSONL planning event log
    pub events_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
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

impl LoggingConfig {
    /// Filter from `RUST_LOG` when set, otherwise from `level`.
    pub fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }
        EnvFilter::try_new(&self.level).map_err(|e| LoggingError::InvalidFilter {
            directive: self.level.clone(),
            reason: e.to_string(),
        })
    }
}

/// Install the global `tracing` subscriber.
///
/// With a log file configured, output goes through a non-blocking daily
/// rolling appender; keep the returned guard alive until shutdown or
/// buffered lines are lost.
pub fn init_tracing(config: &LoggingConfig) -> Result<Option<WorkerGuard>, LoggingError> {
    let filter = config.env_filter()?;

    match &config.file {
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(config.ansi)
                .with_target(config.show_target)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;
            Ok(None)
        }
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| LoggingError::InvalidFile(path.clone()))?;
            let directory = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            std::fs::create_dir_all(&directory)?;

            let appender = tracing_appender::rolling::daily(&directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_target(config.show_target)
                .with_writer(writer)
                .try_init()
                .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;
            Ok(Some(guard))
        }
    }
}
