//! JSONL file writer for meeting events.
//!
//! Each [`MeetingEvent`] is serialized as a single JSON line with `type`,
//! `meeting_id`, and `timestamp` fields, appended via a buffered writer.

use stackline_application::{MeetingEvent, MeetingEventLog};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Meeting-event log that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every event and
/// on `Drop`; the record doubles as the meeting's machine-readable minutes.
pub struct JsonlMeetingLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlMeetingLog {
    /// Create a new log writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("Could not create event log directory {}: {}", parent.display(), e);
                return None;
            }
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MeetingEventLog for JsonlMeetingLog {
    fn log(&self, event: MeetingEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let record = if let serde_json::Value::Object(mut map) = event.payload {
            map.insert("type".to_string(), event.event_type.into());
            map.insert("meeting_id".to_string(), event.meeting_id.to_string().into());
            map.insert("timestamp".to_string(), timestamp.into());
            serde_json::Value::Object(map)
        } else {
            serde_json::json!({
                "type": event.event_type,
                "meeting_id": event.meeting_id.to_string(),
                "timestamp": timestamp,
                "data": event.payload,
            })
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

impl Drop for JsonlMeetingLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackline_domain::MeetingId;

    #[test]
    fn test_writes_one_valid_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("meeting.events.jsonl");
        let log = JsonlMeetingLog::new(&path).unwrap();
        let meeting = MeetingId::generate();

        log.log(MeetingEvent::new(
            "queue_joined",
            meeting,
            serde_json::json!({ "kind": "HAND" }),
        ));
        log.log(MeetingEvent::new(
            "speaker_started",
            meeting,
            serde_json::json!({ "position": 1 }),
        ));
        drop(log);

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["type"], "queue_joined");
        assert_eq!(first["meeting_id"], meeting.to_string());
        assert_eq!(first["kind"], "HAND");
        assert!(first["timestamp"].is_string());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/logs/meeting.jsonl");
        assert!(JsonlMeetingLog::new(&path).is_some());
        assert!(path.exists());
    }
}
