//! Direct-response rate limiting
//!
//! Quotas are derived queries over the timestamped queue-item history, never
//! separately maintained counters, so the limiter can't drift from the
//! record it is limiting.

use chrono::{DateTime, Duration, Utc};
use stackline_domain::{
    MeetingId, MeetingSettings, QueueItemRepository, RepositoryError, UserId,
};

/// Fixed lookback for the direct-response quota, in minutes.
///
/// Independent of `MeetingSettings::direct_response_window_sec`, which is a
/// caller-facing cooldown this component does not enforce.
const LOOKBACK_MINUTES: i64 = 10;

/// Enforces the per-user direct-response quota before a request may enter
/// the queue.
pub struct DirectResponseRateLimiter<'a, Q: QueueItemRepository + ?Sized> {
    queue: &'a Q,
}

impl<'a, Q: QueueItemRepository + ?Sized> DirectResponseRateLimiter<'a, Q> {
    pub fn new(queue: &'a Q) -> Self {
        Self { queue }
    }

    /// Whether the user may request another direct response right now.
    ///
    /// Counts direct-response items this user created in this meeting in
    /// the trailing window, any status; rejects once the count reaches
    /// `max_direct_responses_per_user`.
    pub async fn can_request(
        &self,
        meeting: MeetingId,
        user: UserId,
        settings: &MeetingSettings,
        now: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let cutoff = now - Duration::minutes(LOOKBACK_MINUTES);
        let items = self.queue.items_for_user(meeting, user).await?;
        let recent = items
            .iter()
            .filter(|item| item.kind.is_direct_response() && item.created_at >= cutoff)
            .count();
        Ok((recent as u32) < settings.max_direct_responses_per_user)
    }
}
