//! JSONL file writer for planning events.
//!
//! Each [`PlanningEvent`] becomes one JSON line carrying its `type`, a UTC
//! `timestamp` and a `session` id, appended through a buffered writer.

use planner_application::ports::planning_logger::{PlanningEvent, PlanningEventLogger};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL planning event logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Appends to an existing file so
/// several sessions can share one log; lines are told apart by `session`.
pub struct JsonlPlanningLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    session: String,
}

impl JsonlPlanningLogger {
    /// Open (or create) the log at `path`.
    ///
    /// Creates parent directories as needed. Returns `None` if the file
    /// cannot be opened; planning works without an event log.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create planning log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open planning log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            session: chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string(),
        })
    }

    /// Override the generated session id.
    pub fn with_session(mut self, session: impl Into<String>) -> Self {
        self.session = session.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn session(&self) -> &str {
        &self.session
    }
}

impl PlanningEventLogger for JsonlPlanningLogger {
    fn log(&self, event: PlanningEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = match event.payload {
            serde_json::Value::Object(mut map) => {
                map.insert("type".to_string(), event.event_type.into());
                map.insert("timestamp".to_string(), timestamp.into());
                map.insert("session".to_string(), self.session.clone().into());
                serde_json::Value::Object(map)
            }
            other => serde_json::json!({
                "type": event.event_type,
                "timestamp": timestamp,
                "session": self.session,
                "data": other,
            }),
        };

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlPlanningLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events").join("plan.jsonl");
        let logger = JsonlPlanningLogger::new(&path).unwrap().with_session("s1");

        logger.log(PlanningEvent::new(
            "round_started",
            serde_json::json!({ "round": 1, "best_margin": 0.0 }),
        ));
        logger.log(PlanningEvent::new(
            "round_aggregated",
            serde_json::json!({ "round": 1, "margin": 0.2, "winner_id": "c0" }),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(record.get("timestamp").is_some());
            assert_eq!(record["session"], "s1");
        }
        assert_eq!(records[0]["type"], "round_started");
        assert_eq!(records[1]["type"], "round_aggregated");
        assert_eq!(records[1]["winner_id"], "c0");
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.jsonl");
        let logger = JsonlPlanningLogger::new(&path).unwrap();

        logger.log(PlanningEvent::new("note", serde_json::json!("just a string")));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "note");
        assert_eq!(records[0]["data"], "just a string");
    }

    #[test]
    fn test_appends_across_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.jsonl");

        for session in ["a", "b"] {
            let logger = JsonlPlanningLogger::new(&path)
                .unwrap()
                .with_session(session);
            logger.log(PlanningEvent::new("plan_finished", serde_json::json!({})));
        }

        let sessions: Vec<_> = read_lines(&path)
            .iter()
            .map(|r| r["session"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(sessions, vec!["a", "b"]);
    }

    #[test]
    fn test_unwritable_path_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        assert!(JsonlPlanningLogger::new(blocker.join("nested.jsonl")).is_none());
    }
}
