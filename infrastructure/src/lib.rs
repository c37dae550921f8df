//! Infrastructure layer for stackline
//!
//! Adapters behind the domain repository traits and application ports: the
//! in-memory store, the system clock, per-key serialization locks, the
//! figment config loader, and the JSONL meeting-event log.

pub mod clock;
pub mod config;
pub mod logging;
pub mod memory;
pub mod sync;

pub use clock::SystemClock;
pub use config::{ConfigLoader, StacklineConfig};
pub use logging::JsonlMeetingLog;
pub use memory::InMemoryStore;
pub use sync::KeyedLock;
