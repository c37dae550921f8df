//! Port for structured meeting-event logging.
//!
//! Separate from `tracing`-based operation logs: tracing carries
//! human-readable diagnostics, while this port captures the meeting record
//! (joins, speaker changes, votes, decisions) in a machine-readable form.

use serde_json::Value;
use stackline_domain::MeetingId;

/// A structured meeting event for logging.
pub struct MeetingEvent {
    /// Event type identifier (e.g., "queue_joined", "speaker_started",
    /// "vote_cast", "proposal_decided").
    pub event_type: &'static str,
    pub meeting_id: MeetingId,
    /// JSON payload with event-specific fields.
    pub payload: Value,
}

impl MeetingEvent {
    pub fn new(event_type: &'static str, meeting_id: MeetingId, payload: Value) -> Self {
        Self {
            event_type,
            meeting_id,
            payload,
        }
    }
}

/// Port for recording meeting events to a structured log.
///
/// `log` is synchronous and non-fallible so the main flow is never
/// disrupted; implementations swallow their own write failures.
pub trait MeetingEventLog: Send + Sync {
    fn log(&self, event: MeetingEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoMeetingEventLog;

impl MeetingEventLog for NoMeetingEventLog {
    fn log(&self, _event: MeetingEvent) {}
}
