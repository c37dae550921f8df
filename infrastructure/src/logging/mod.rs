//! Structured meeting-event logging adapters.

pub mod jsonl;

pub use jsonl::JsonlMeetingLog;
