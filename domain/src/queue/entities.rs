//! Speaking-queue domain entities
//!
//! A [`QueueItem`] is one request to speak. Items move through a small state
//! machine — Waiting, Speaking, then the terminal Done or Skipped — and carry
//! an append-only audit trail of removal and reorder annotations.

use crate::core::ids::{MeetingId, QueueItemId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of speaking request.
///
/// Points interrupt ahead of everything; direct responses queue-jump ahead of
/// plain hands; hands wait their FIFO turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueItemKind {
    /// Regular request to speak.
    Hand,
    /// Brief interjection responding to the current speaker; rate-limited.
    DirectResponse,
    /// Meta-discussion about how the meeting itself is run.
    PointProcess,
    /// Sharing of directly relevant information.
    PointInfo,
    /// Request to clarify something just said.
    PointClarification,
}

impl QueueItemKind {
    /// Priority tier for point-type interrupts. Non-points are tier 0.
    pub fn point_priority(&self) -> u8 {
        match self {
            QueueItemKind::PointProcess => 3,
            QueueItemKind::PointInfo => 2,
            QueueItemKind::PointClarification => 1,
            QueueItemKind::Hand | QueueItemKind::DirectResponse => 0,
        }
    }

    pub fn is_direct_response(&self) -> bool {
        matches!(self, QueueItemKind::DirectResponse)
    }
}

impl std::fmt::Display for QueueItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            QueueItemKind::Hand => "hand",
            QueueItemKind::DirectResponse => "direct response",
            QueueItemKind::PointProcess => "point of process",
            QueueItemKind::PointInfo => "point of information",
            QueueItemKind::PointClarification => "point of clarification",
        };
        write!(f, "{}", name)
    }
}

/// Lifecycle state of a queue item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueueItemStatus {
    Waiting,
    Speaking,
    Done,
    Skipped,
}

impl QueueItemStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, QueueItemStatus::Done | QueueItemStatus::Skipped)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueueItemStatus::Waiting => "waiting",
            QueueItemStatus::Speaking => "speaking",
            QueueItemStatus::Done => "done",
            QueueItemStatus::Skipped => "skipped",
        }
    }
}

/// One annotation in a queue item's append-only audit trail.
///
/// Closed shapes rather than a free-form metadata bag: only the fields the
/// facilitation logic actually records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditEntry {
    /// Item was removed from the queue (status set to Skipped).
    Removed {
        by: UserId,
        reason: String,
        at: DateTime<Utc>,
    },
    /// A facilitator requested a manual position. Advisory only: the
    /// ordering engine recomputes order from scratch and never reads these.
    ReorderRequested {
        by: UserId,
        new_position: usize,
        reason: String,
        at: DateTime<Utc>,
    },
}

/// A request to speak (Entity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: QueueItemId,
    pub meeting_id: MeetingId,
    pub user_id: UserId,
    pub kind: QueueItemKind,
    pub status: QueueItemStatus,
    /// Assigned at creation, never changed afterwards.
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Self-declared tags matched against the meeting's invite tags by the
    /// progressive stack. Empty when the requester declared none.
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub audit_trail: Vec<AuditEntry>,
}

impl QueueItem {
    /// Create a new Waiting item.
    pub fn new(
        meeting_id: MeetingId,
        user_id: UserId,
        kind: QueueItemKind,
        tags: BTreeSet<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: QueueItemId::generate(),
            meeting_id,
            user_id,
            kind,
            status: QueueItemStatus::Waiting,
            created_at,
            started_at: None,
            completed_at: None,
            tags,
            audit_trail: Vec::new(),
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.status == QueueItemStatus::Waiting
    }

    pub fn is_speaking(&self) -> bool {
        self.status == QueueItemStatus::Speaking
    }

    /// Transition Waiting → Speaking.
    pub fn start_speaking(&mut self, now: DateTime<Utc>) {
        self.status = QueueItemStatus::Speaking;
        self.started_at = Some(now);
    }

    /// Transition Speaking → Done.
    pub fn finish_speaking(&mut self, now: DateTime<Utc>) {
        self.status = QueueItemStatus::Done;
        self.completed_at = Some(now);
    }

    /// Transition Waiting → Skipped, recording who removed it and why.
    pub fn skip(&mut self, by: UserId, reason: String, now: DateTime<Utc>) {
        self.status = QueueItemStatus::Skipped;
        self.audit_trail.push(AuditEntry::Removed { by, reason, at: now });
    }

    /// Append a manual-reorder annotation. Does not change computed order.
    pub fn note_reorder(&mut self, by: UserId, new_position: usize, reason: String, now: DateTime<Utc>) {
        self.audit_trail.push(AuditEntry::ReorderRequested {
            by,
            new_position,
            reason,
            at: now,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(kind: QueueItemKind) -> QueueItem {
        QueueItem::new(
            MeetingId::generate(),
            UserId::generate(),
            kind,
            BTreeSet::new(),
            Utc::now(),
        )
    }

    #[test]
    fn test_point_priorities() {
        assert_eq!(QueueItemKind::PointProcess.point_priority(), 3);
        assert_eq!(QueueItemKind::PointInfo.point_priority(), 2);
        assert_eq!(QueueItemKind::PointClarification.point_priority(), 1);
        assert_eq!(QueueItemKind::Hand.point_priority(), 0);
        assert_eq!(QueueItemKind::DirectResponse.point_priority(), 0);
    }

    #[test]
    fn test_new_item_is_waiting_with_empty_trail() {
        let item = item(QueueItemKind::Hand);
        assert!(item.is_waiting());
        assert!(item.started_at.is_none());
        assert!(item.completed_at.is_none());
        assert!(item.audit_trail.is_empty());
    }

    #[test]
    fn test_speaking_lifecycle_sets_timestamps() {
        let mut item = item(QueueItemKind::Hand);
        let started = Utc::now();
        item.start_speaking(started);
        assert!(item.is_speaking());
        assert_eq!(item.started_at, Some(started));

        let finished = Utc::now();
        item.finish_speaking(finished);
        assert_eq!(item.status, QueueItemStatus::Done);
        assert!(item.status.is_terminal());
        assert_eq!(item.completed_at, Some(finished));
    }

    #[test]
    fn test_skip_appends_to_audit_trail() {
        let mut item = item(QueueItemKind::Hand);
        let facilitator = UserId::generate();
        item.note_reorder(facilitator, 1, "bump to front".into(), Utc::now());
        item.skip(facilitator, "off topic".into(), Utc::now());

        assert_eq!(item.status, QueueItemStatus::Skipped);
        // Prior entries are preserved
        assert_eq!(item.audit_trail.len(), 2);
        assert!(matches!(item.audit_trail[0], AuditEntry::ReorderRequested { .. }));
        assert!(matches!(item.audit_trail[1], AuditEntry::Removed { .. }));
    }
}
