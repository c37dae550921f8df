//! Speaking-queue aggregate: items, lifecycle states, audit trail.

pub mod entities;
pub mod repository;

pub use entities::{AuditEntry, QueueItem, QueueItemKind, QueueItemStatus};
pub use repository::QueueItemRepository;
