//! Line-delimited JSON records of a checker run
//!
//! Each record carries the run id, a timestamp, the event name and its data.
//! The human-readable log stream is unaffected.

use chrono::Utc;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::warn;
use uuid::Uuid;

/// Record event names
pub mod events {
    pub const CACHE_FOUND: &str = "cache.found";
    pub const VERIFY_FINDING: &str = "verify.finding";
    pub const VERIFY_COUNT: &str = "verify.count";
    pub const REAP_DESTROY: &str = "reap.destroy";
    pub const RUN_RESULT: &str = "run.result";
}

/// Appends JSON records to a file, or drops them when no file is set
pub struct RecordSink {
    run_id: Uuid,
    path: Option<PathBuf>,
}

impl RecordSink {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            path,
        }
    }

    /// A sink that writes nothing
    pub fn disabled() -> Self {
        Self::new(None)
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write one record. Failures are logged and never reach the caller.
    pub async fn emit<T: Serialize + ?Sized>(&self, event: &str, data: &T) {
        let Some(ref path) = self.path else {
            return;
        };

        let entry = serde_json::json!({
            "run_id": self.run_id,
            "timestamp": Utc::now().to_rfc3339(),
            "event": event,
            "data": data,
        });

        let mut line = match serde_json::to_string(&entry) {
            Ok(s) => s,
            Err(e) => {
                warn!("Failed to serialize {} record: {}", event, e);
                return;
            }
        };
        line.push('\n');

        if let Err(e) = append(path, &line).await {
            warn!("Failed to write record to {}: {}", path.display(), e);
        }
    }
}

async fn append(path: &Path, line: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;

    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn writes_tagged_json_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records").join("run.jsonl");
        let sink = RecordSink::new(Some(path.clone()));

        sink.emit(events::CACHE_FOUND, &serde_json::json!({"name": "T1"}))
            .await;
        sink.emit(events::RUN_RESULT, &serde_json::json!({"success": true}))
            .await;

        let content = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "cache.found");
        assert_eq!(lines[0]["data"]["name"], "T1");
        assert_eq!(lines[0]["run_id"], lines[1]["run_id"]);
        assert_eq!(lines[1]["run_id"], sink.run_id().to_string());
        assert!(lines[1]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn disabled_sink_writes_nothing() {
        let sink = RecordSink::disabled();
        sink.emit(events::RUN_RESULT, &serde_json::json!({})).await;
        assert!(sink.path().is_none());
    }

    #[tokio::test]
    async fn unwritable_path_does_not_fail() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        let sink = RecordSink::new(Some(blocker.join("run.jsonl")));
        sink.emit(events::RUN_RESULT, &serde_json::json!({})).await;
    }
}
