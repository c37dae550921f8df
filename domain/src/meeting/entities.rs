//! Meeting domain entities

use crate::core::ids::{MeetingId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-meeting facilitation settings.
///
/// Owned by the meeting and read-only to the ordering engine and rate
/// limiter; a settings-update operation replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingSettings {
    /// Enable progressive-stack weighting in queue ordering.
    pub progressive_stack: bool,
    /// Caller-facing cooldown between direct responses, in seconds.
    ///
    /// Surfaced to clients; the rate limiter uses its own fixed 10-minute
    /// lookback independent of this value.
    pub direct_response_window_sec: u32,
    /// Direct responses allowed per user within the rate-limit window.
    pub max_direct_responses_per_user: u32,
    /// Suggested speaking time per speaker, in seconds.
    pub time_per_speaker_sec: u32,
    /// Tags that receive a progressive-stack boost when matched by a
    /// queue item's tags.
    pub invite_tags: BTreeSet<String>,
}

impl Default for MeetingSettings {
    fn default() -> Self {
        Self {
            progressive_stack: false,
            direct_response_window_sec: 30,
            max_direct_responses_per_user: 3,
            time_per_speaker_sec: 180,
            invite_tags: BTreeSet::new(),
        }
    }
}

impl MeetingSettings {
    pub fn with_progressive_stack(mut self, invite_tags: impl IntoIterator<Item = String>) -> Self {
        self.progressive_stack = true;
        self.invite_tags = invite_tags.into_iter().collect();
        self
    }
}

/// A facilitated meeting (Entity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub title: String,
    pub description: Option<String>,
    /// Short join code shared with participants.
    pub pin: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub settings: MeetingSettings,
}

impl Meeting {
    pub fn new(
        title: impl Into<String>,
        description: Option<String>,
        pin: impl Into<String>,
        settings: MeetingSettings,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MeetingId::generate(),
            title: title.into(),
            description,
            pin: pin.into(),
            is_active: true,
            created_at,
            settings,
        }
    }

    /// Mark the meeting ended. Idempotent.
    pub fn end(&mut self) {
        self.is_active = false;
    }
}

/// Role of a participant within a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Runs the meeting: starts/ends speakers, overrides proposal status.
    Facilitator,
    /// Keeps the stack on the facilitator's behalf.
    StackKeeper,
    Participant,
    /// Present without speaking or voting rights.
    Observer,
}

impl Role {
    pub fn is_facilitator(&self) -> bool {
        matches!(self, Role::Facilitator)
    }
}

/// Membership of a user in a meeting (Entity, keyed by meeting + user).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub meeting_id: MeetingId,
    pub user_id: UserId,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
    /// Set when the participant leaves; participants with `left_at` unset
    /// are "active" and count toward consensus quorum.
    pub left_at: Option<DateTime<Utc>>,
}

impl Participant {
    pub fn new(meeting_id: MeetingId, user_id: UserId, role: Role, joined_at: DateTime<Utc>) -> Self {
        Self {
            meeting_id,
            user_id,
            role,
            joined_at,
            left_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.left_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_match_meeting_defaults() {
        let settings = MeetingSettings::default();
        assert!(!settings.progressive_stack);
        assert_eq!(settings.direct_response_window_sec, 30);
        assert_eq!(settings.max_direct_responses_per_user, 3);
        assert_eq!(settings.time_per_speaker_sec, 180);
        assert!(settings.invite_tags.is_empty());
    }

    #[test]
    fn test_with_progressive_stack_sets_tags() {
        let settings =
            MeetingSettings::default().with_progressive_stack(vec!["new_to_group".to_string()]);
        assert!(settings.progressive_stack);
        assert!(settings.invite_tags.contains("new_to_group"));
    }

    #[test]
    fn test_meeting_end_is_idempotent() {
        let mut meeting = Meeting::new("Weekly", None, "ABC123", MeetingSettings::default(), Utc::now());
        assert!(meeting.is_active);
        meeting.end();
        meeting.end();
        assert!(!meeting.is_active);
    }

    #[test]
    fn test_participant_active_until_left() {
        let mut participant = Participant::new(
            MeetingId::generate(),
            UserId::generate(),
            Role::Participant,
            Utc::now(),
        );
        assert!(participant.is_active());
        participant.left_at = Some(Utc::now());
        assert!(!participant.is_active());
    }

    #[test]
    fn test_only_facilitator_role_is_facilitator() {
        assert!(Role::Facilitator.is_facilitator());
        assert!(!Role::StackKeeper.is_facilitator());
        assert!(!Role::Participant.is_facilitator());
        assert!(!Role::Observer.is_facilitator());
    }
}
