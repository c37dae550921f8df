//! Stack ordering comparator
//!
//! Ordering rules, most significant first:
//!
//! 1. Point priority (process > info > clarification > none)
//! 2. Direct responses ahead of regular hands
//! 3. Progressive-stack boost (if enabled): invite-tag match and/or
//!    not having spoken recently
//! 4. FIFO by creation time, insertion order on exact ties
//!
//! The comparator is a pure function of its inputs. Re-running it over the
//! same items always yields the same order, which is what makes facilitation
//! decisions auditable: any position can be reproduced and explained after
//! the fact.

use crate::core::ids::UserId;
use crate::meeting::entities::MeetingSettings;
use crate::queue::entities::{QueueItem, QueueItemStatus};
use std::cmp::{Ordering, Reverse};
use std::collections::HashSet;

/// Progressive-stack boost when the speaker both carries an invite tag and
/// has not spoken recently.
const BOOST_TAG_AND_FRESH: u8 = 10;
/// Boost for an invite-tag match alone.
const BOOST_TAG_ONLY: u8 = 5;
/// Boost for not having spoken recently alone.
const BOOST_FRESH_ONLY: u8 = 2;

/// Deterministic comparator over waiting queue items.
///
/// Holds borrowed settings and the recent-speakers set for one ordering
/// pass; construct it fresh from current data on every queue read.
pub struct StackOrdering<'a> {
    settings: &'a MeetingSettings,
    recent_speakers: &'a HashSet<UserId>,
}

/// Composite sort key. Lexicographic, most significant field first; `Reverse`
/// on the priority fields because higher priority sorts earlier.
type SortKey = (Reverse<u8>, Reverse<bool>, Reverse<u8>, chrono::DateTime<chrono::Utc>);

impl<'a> StackOrdering<'a> {
    pub fn new(settings: &'a MeetingSettings, recent_speakers: &'a HashSet<UserId>) -> Self {
        Self {
            settings,
            recent_speakers,
        }
    }

    /// Sort queue items according to the stack facilitation rules.
    ///
    /// Non-waiting items are dropped. The sort is stable: items with
    /// identical keys keep their relative input order.
    pub fn sort(&self, items: Vec<QueueItem>) -> Vec<QueueItem> {
        let mut waiting: Vec<QueueItem> = items
            .into_iter()
            .filter(|item| item.status == QueueItemStatus::Waiting)
            .collect();
        waiting.sort_by_key(|item| self.sort_key(item));
        waiting
    }

    /// Compare two items for ordering. `Less` means `a` speaks first.
    pub fn compare(&self, a: &QueueItem, b: &QueueItem) -> Ordering {
        self.sort_key(a).cmp(&self.sort_key(b))
    }

    fn sort_key(&self, item: &QueueItem) -> SortKey {
        (
            Reverse(item.kind.point_priority()),
            Reverse(item.kind.is_direct_response()),
            Reverse(self.progressive_priority(item)),
            item.created_at,
        )
    }

    /// Whether the item's tags intersect the meeting's invite tags.
    pub fn has_invite_tag(&self, item: &QueueItem) -> bool {
        item.tags
            .iter()
            .any(|tag| self.settings.invite_tags.contains(tag))
    }

    /// Whether the item's owner has not spoken recently.
    pub fn is_fresh_voice(&self, item: &QueueItem) -> bool {
        !self.recent_speakers.contains(&item.user_id)
    }

    /// Progressive-stack boost for an item; 0 whenever the feature is off.
    ///
    /// The four tiers are exact constants, not tunable — facilitators audit
    /// positions against these published numbers.
    pub fn progressive_priority(&self, item: &QueueItem) -> u8 {
        if !self.settings.progressive_stack {
            return 0;
        }
        match (self.has_invite_tag(item), self.is_fresh_voice(item)) {
            (true, true) => BOOST_TAG_AND_FRESH,
            (true, false) => BOOST_TAG_ONLY,
            (false, true) => BOOST_FRESH_ONLY,
            (false, false) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::MeetingId;
    use crate::queue::entities::QueueItemKind;
    use chrono::{Duration, Utc};
    use std::collections::BTreeSet;

    fn item_at(
        user: UserId,
        kind: QueueItemKind,
        offset_sec: i64,
        tags: &[&str],
    ) -> QueueItem {
        let mut item = QueueItem::new(
            MeetingId::generate(),
            user,
            kind,
            tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
            Utc::now() + Duration::seconds(offset_sec),
        );
        item.status = QueueItemStatus::Waiting;
        item
    }

    fn no_recent() -> HashSet<UserId> {
        HashSet::new()
    }

    #[test]
    fn test_empty_input_yields_empty_output() {
        let settings = MeetingSettings::default();
        let recent = no_recent();
        let ordering = StackOrdering::new(&settings, &recent);
        assert!(ordering.sort(vec![]).is_empty());
    }

    #[test]
    fn test_non_waiting_items_are_dropped() {
        let settings = MeetingSettings::default();
        let recent = no_recent();
        let ordering = StackOrdering::new(&settings, &recent);

        let mut speaking = item_at(UserId::generate(), QueueItemKind::Hand, 0, &[]);
        speaking.start_speaking(Utc::now());
        let waiting = item_at(UserId::generate(), QueueItemKind::Hand, 1, &[]);

        let sorted = ordering.sort(vec![speaking, waiting.clone()]);
        assert_eq!(sorted.len(), 1);
        assert_eq!(sorted[0].id, waiting.id);
    }

    #[test]
    fn test_points_outrank_everything_regardless_of_timestamps() {
        let settings = MeetingSettings::default();
        let recent = no_recent();
        let ordering = StackOrdering::new(&settings, &recent);

        let process = item_at(UserId::generate(), QueueItemKind::PointProcess, 100, &[]);
        let info = item_at(UserId::generate(), QueueItemKind::PointInfo, 50, &[]);
        let clarification =
            item_at(UserId::generate(), QueueItemKind::PointClarification, 20, &[]);
        let direct = item_at(UserId::generate(), QueueItemKind::DirectResponse, 0, &[]);
        let hand = item_at(UserId::generate(), QueueItemKind::Hand, -100, &[]);

        let sorted = ordering.sort(vec![
            hand.clone(),
            direct.clone(),
            clarification.clone(),
            info.clone(),
            process.clone(),
        ]);
        let ids: Vec<_> = sorted.iter().map(|i| i.id).collect();
        assert_eq!(
            ids,
            vec![process.id, info.id, clarification.id, direct.id, hand.id]
        );
    }

    #[test]
    fn test_direct_response_jumps_ahead_of_earlier_hands() {
        // HAND@t1(Alice), HAND@t2(Bob), DIRECT_RESPONSE@t3(Charlie)
        // with progressive stack off: Charlie, Alice, Bob.
        let settings = MeetingSettings::default();
        let recent = no_recent();
        let ordering = StackOrdering::new(&settings, &recent);

        let alice = item_at(UserId::generate(), QueueItemKind::Hand, 1, &[]);
        let bob = item_at(UserId::generate(), QueueItemKind::Hand, 2, &[]);
        let charlie = item_at(UserId::generate(), QueueItemKind::DirectResponse, 3, &[]);

        let sorted = ordering.sort(vec![alice.clone(), bob.clone(), charlie.clone()]);
        let ids: Vec<_> = sorted.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![charlie.id, alice.id, bob.id]);
    }

    #[test]
    fn test_progressive_stack_tiers() {
        let settings = MeetingSettings::default()
            .with_progressive_stack(vec!["new_to_group".to_string()]);
        let spoke_recently = UserId::generate();
        let recent: HashSet<UserId> = [spoke_recently].into_iter().collect();
        let ordering = StackOrdering::new(&settings, &recent);

        let tagged_fresh = item_at(UserId::generate(), QueueItemKind::Hand, 0, &["new_to_group"]);
        let tagged_recent = item_at(spoke_recently, QueueItemKind::Hand, 0, &["new_to_group"]);
        let untagged_fresh = item_at(UserId::generate(), QueueItemKind::Hand, 0, &[]);
        let untagged_recent = item_at(spoke_recently, QueueItemKind::Hand, 0, &["other_tag"]);

        assert_eq!(ordering.progressive_priority(&tagged_fresh), 10);
        assert_eq!(ordering.progressive_priority(&tagged_recent), 5);
        assert_eq!(ordering.progressive_priority(&untagged_fresh), 2);
        assert_eq!(ordering.progressive_priority(&untagged_recent), 0);
    }

    #[test]
    fn test_progressive_stack_outweighs_fifo() {
        // Tagged fresh voice with a later timestamp ranks above a recent
        // speaker with an earlier one: 10 > 0.
        let settings = MeetingSettings::default()
            .with_progressive_stack(vec!["new_to_group".to_string()]);
        let bob = UserId::generate();
        let recent: HashSet<UserId> = [bob].into_iter().collect();
        let ordering = StackOrdering::new(&settings, &recent);

        let alice_item = item_at(UserId::generate(), QueueItemKind::Hand, 10, &["new_to_group"]);
        let bob_item = item_at(bob, QueueItemKind::Hand, 0, &[]);

        let sorted = ordering.sort(vec![bob_item.clone(), alice_item.clone()]);
        assert_eq!(sorted[0].id, alice_item.id);
        assert_eq!(sorted[1].id, bob_item.id);
    }

    #[test]
    fn test_progressive_priority_is_zero_when_disabled() {
        let settings = MeetingSettings {
            progressive_stack: false,
            invite_tags: ["new_to_group".to_string()].into_iter().collect(),
            ..MeetingSettings::default()
        };
        let recent = no_recent();
        let ordering = StackOrdering::new(&settings, &recent);

        let tagged = item_at(UserId::generate(), QueueItemKind::Hand, 0, &["new_to_group"]);
        assert_eq!(ordering.progressive_priority(&tagged), 0);
    }

    #[test]
    fn test_identical_timestamps_keep_insertion_order() {
        let settings = MeetingSettings::default();
        let recent = no_recent();
        let ordering = StackOrdering::new(&settings, &recent);

        let at = Utc::now();
        let meeting = MeetingId::generate();
        let first = QueueItem::new(meeting, UserId::generate(), QueueItemKind::Hand, BTreeSet::new(), at);
        let second = QueueItem::new(meeting, UserId::generate(), QueueItemKind::Hand, BTreeSet::new(), at);

        let sorted = ordering.sort(vec![first.clone(), second.clone()]);
        assert_eq!(sorted[0].id, first.id);
        assert_eq!(sorted[1].id, second.id);
    }

    #[test]
    fn test_sort_is_deterministic() {
        let settings = MeetingSettings::default()
            .with_progressive_stack(vec!["caucus".to_string()]);
        let recent: HashSet<UserId> = [UserId::generate()].into_iter().collect();
        let ordering = StackOrdering::new(&settings, &recent);

        let items: Vec<QueueItem> = (0..20)
            .map(|i| {
                let kind = match i % 4 {
                    0 => QueueItemKind::Hand,
                    1 => QueueItemKind::DirectResponse,
                    2 => QueueItemKind::PointInfo,
                    _ => QueueItemKind::PointClarification,
                };
                let tags: &[&str] = if i % 3 == 0 { &["caucus"] } else { &[] };
                item_at(UserId::generate(), kind, i, tags)
            })
            .collect();

        let first: Vec<_> = ordering.sort(items.clone()).iter().map(|i| i.id).collect();
        let second: Vec<_> = ordering.sort(items).iter().map(|i| i.id).collect();
        assert_eq!(first, second);
    }
}
