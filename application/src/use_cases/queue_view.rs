//! Ordered queue reads
//!
//! Recomputes the speaking order from scratch on every read: recent
//! speakers are derived from completed items, fed to the pure ordering
//! engine, and each position gets an explanation from the same signals.

use crate::ports::clock::Clock;
use crate::use_cases::queue::QueueError;
use chrono::Duration;
use stackline_domain::{
    ordering_reason, FacilitationError, MeetingId, MeetingRepository, QueueItem,
    QueueItemRepository, QueueItemStatus, StackOrdering, UserId,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// How many recently completed speakers feed the progressive stack.
const RECENT_SPEAKER_COUNT: usize = 5;
/// Completed turns older than this no longer count as "recent", in minutes.
const RECENT_SPEAKER_WINDOW_MINUTES: i64 = 60;

/// One entry of the ordered queue, with its 1-based position and the
/// reason it sits there.
#[derive(Debug, Clone)]
pub struct OrderedQueueEntry {
    pub position: usize,
    pub reason: String,
    pub item: QueueItem,
}

/// Read-side of the stack: ordered queue with explanations.
pub struct QueueView<Q, M> {
    queue: Arc<Q>,
    meetings: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<Q, M> QueueView<Q, M>
where
    Q: QueueItemRepository,
    M: MeetingRepository,
{
    pub fn new(queue: Arc<Q>, meetings: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            queue,
            meetings,
            clock,
        }
    }

    /// Users who completed one of the last few speaking turns within the
    /// trailing window. Only membership matters to the ordering engine.
    pub async fn recent_speakers(
        &self,
        meeting: MeetingId,
    ) -> Result<HashSet<UserId>, QueueError> {
        let cutoff = self.clock.now() - Duration::minutes(RECENT_SPEAKER_WINDOW_MINUTES);
        let mut done = self
            .queue
            .items_with_status(meeting, QueueItemStatus::Done)
            .await?;
        done.retain(|item| item.completed_at.is_some_and(|at| at >= cutoff));
        done.sort_by_key(|item| std::cmp::Reverse(item.completed_at));

        Ok(done
            .iter()
            .take(RECENT_SPEAKER_COUNT)
            .map(|item| item.user_id)
            .collect())
    }

    /// The current stack: waiting items in speaking order, each with its
    /// position and ordering reason.
    pub async fn ordered_queue(
        &self,
        meeting_id: MeetingId,
    ) -> Result<Vec<OrderedQueueEntry>, QueueError> {
        let meeting = self
            .meetings
            .find_meeting(meeting_id)
            .await?
            .ok_or(FacilitationError::MeetingNotFound(meeting_id))?;

        let waiting = self
            .queue
            .items_with_status(meeting_id, QueueItemStatus::Waiting)
            .await?;
        let recent = self.recent_speakers(meeting_id).await?;
        debug!(%meeting_id, waiting = waiting.len(), recent = recent.len(), "ordering queue");

        let ordering = StackOrdering::new(&meeting.settings, &recent);
        let ordered = ordering.sort(waiting);

        Ok(ordered
            .into_iter()
            .enumerate()
            .map(|(index, item)| OrderedQueueEntry {
                position: index + 1,
                reason: ordering_reason(&item, &meeting.settings, &recent),
                item,
            })
            .collect())
    }
}
