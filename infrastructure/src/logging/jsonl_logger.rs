//! JSONL file writer for workflow events.
//!
//! Each event is serialized as a single JSON line with a `type` field and
//! `timestamp`, appended to the file via a buffered writer.

use seeker_application::{TurnSummary, WorkflowObserver};
use seeker_domain::{Command, NodeId};
use serde_json::{Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::warn;

/// Workflow event logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlEventLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLogger {
    /// Open (or create) the log at `path` in append mode.
    ///
    /// Creates parent directories if needed. Returns `None` if the file
    /// cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn log(&self, event_type: &str, payload: Value) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = match payload {
            Value::Object(mut map) => {
                map.insert("type".to_string(), Value::String(event_type.to_string()));
                map.insert("timestamp".to_string(), Value::String(timestamp));
                Value::Object(map)
            }
            other => json!({
                "type": event_type,
                "timestamp": timestamp,
                "data": other,
            }),
        };

        let Ok(mut writer) = self.writer.lock() else {
            warn!("Event log writer lock poisoned");
            return;
        };
        if let Err(e) = serde_json::to_writer(&mut *writer, &record) {
            warn!("Failed to serialize workflow event: {}", e);
            return;
        }
        if let Err(e) = writer.write_all(b"\n").and_then(|_| writer.flush()) {
            warn!("Failed to write workflow event: {}", e);
        }
    }
}

impl WorkflowObserver for JsonlEventLogger {
    fn on_turn_start(&self, session_id: &str, correlation_id: &str) {
        self.log(
            "turn_start",
            json!({ "session_id": session_id, "correlation_id": correlation_id }),
        );
    }

    fn on_node_start(&self, node: NodeId) {
        self.log("node_start", json!({ "node": node.as_str() }));
    }

    fn on_node_complete(&self, node: NodeId, command: &Command, elapsed: Duration) {
        let faults: Vec<Value> = command
            .shared_data
            .as_ref()
            .map(|shared| {
                shared
                    .node_faults
                    .iter()
                    .map(|f| json!({ "kind": f.kind.as_str(), "detail": f.detail }))
                    .collect()
            })
            .unwrap_or_default();
        self.log(
            "node_complete",
            json!({
                "node": node.as_str(),
                "duration_ms": elapsed.as_millis() as u64,
                "messages": command.messages.len(),
                "faults": faults,
            }),
        );
    }

    fn on_route(&self, from: NodeId, to: &[NodeId]) {
        let targets: Vec<&str> = to.iter().map(NodeId::as_str).collect();
        self.log("route", json!({ "from": from.as_str(), "to": targets }));
    }

    fn on_turn_complete(&self, summary: &TurnSummary) {
        let payload = serde_json::to_value(summary).unwrap_or_else(|_| json!({}));
        self.log("turn_complete", payload);
    }
}

impl Drop for JsonlEventLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
