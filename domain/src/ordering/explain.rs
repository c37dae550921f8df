//! Ordering explanations
//!
//! Derives a human-readable justification for an item's queue position from
//! exactly the signals the comparator consults — point tier, direct-response
//! flag, invite-tag match, freshness. Because both read the same inputs, the
//! displayed reason can never diverge from the computed position.

use super::stack::StackOrdering;
use crate::core::ids::UserId;
use crate::meeting::entities::MeetingSettings;
use crate::queue::entities::{QueueItem, QueueItemKind};
use std::collections::HashSet;

/// Explain why an item sits where it does, reasons in order of significance.
///
/// Falls back to exactly `"First in, first out"` when no priority rule
/// applies.
pub fn ordering_reason(
    item: &QueueItem,
    settings: &MeetingSettings,
    recent_speakers: &HashSet<UserId>,
) -> String {
    let ordering = StackOrdering::new(settings, recent_speakers);
    let mut reasons: Vec<String> = Vec::new();

    match item.kind {
        QueueItemKind::PointProcess => {
            reasons.push("Point of process (highest priority)".to_string())
        }
        QueueItemKind::PointInfo => reasons.push("Point of information".to_string()),
        QueueItemKind::PointClarification => {
            reasons.push("Point of clarification".to_string())
        }
        QueueItemKind::DirectResponse => reasons.push("Direct response".to_string()),
        QueueItemKind::Hand => {}
    }

    if settings.progressive_stack {
        if ordering.has_invite_tag(item) {
            let matched: Vec<&str> = item
                .tags
                .iter()
                .filter(|tag| settings.invite_tags.contains(*tag))
                .map(String::as_str)
                .collect();
            reasons.push(format!("Invite tags: {}", matched.join(", ")));
        }
        if ordering.is_fresh_voice(item) {
            reasons.push("Has not spoken recently".to_string());
        }
    }

    if reasons.is_empty() {
        return "First in, first out".to_string();
    }
    reasons.join("; ")
}
