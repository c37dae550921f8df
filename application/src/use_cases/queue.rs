//! Queue lifecycle use cases
//!
//! Owns the valid state transitions of a speaking request: join, remove,
//! start, end, and advisory reorder. Every operation is a fail-fast
//! check-then-write sequence — a rejected check commits nothing. Callers
//! serialize these per meeting (see the crate docs).

use crate::ports::clock::Clock;
use crate::use_cases::rate_limit::DirectResponseRateLimiter;
use crate::use_cases::shared::{require_active_meeting, require_facilitator};
use stackline_domain::{
    FacilitationError, MeetingId, MeetingRepository, QueueItem, QueueItemId, QueueItemKind,
    QueueItemRepository, QueueItemStatus, RepositoryError, UserId,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised by queue lifecycle operations.
#[derive(Error, Debug)]
pub enum QueueError {
    #[error(transparent)]
    Domain(#[from] FacilitationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Queue lifecycle manager.
///
/// Enforces the single-waiting-item-per-user and single-active-speaker
/// invariants at the write boundary.
pub struct QueueLifecycle<Q, M> {
    queue: Arc<Q>,
    meetings: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<Q, M> QueueLifecycle<Q, M>
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

    /// Add a speaking request to the stack.
    ///
    /// Requires an active meeting and no existing waiting item for this
    /// user; direct responses must also pass the rate limiter.
    pub async fn join(
        &self,
        meeting_id: MeetingId,
        user_id: UserId,
        kind: QueueItemKind,
        tags: BTreeSet<String>,
    ) -> Result<QueueItem, QueueError> {
        let meeting = require_active_meeting::<_, QueueError>(&*self.meetings, meeting_id).await?;
        let now = self.clock.now();

        if kind.is_direct_response() {
            let limiter = DirectResponseRateLimiter::new(&*self.queue);
            if !limiter
                .can_request(meeting_id, user_id, &meeting.settings, now)
                .await?
            {
                warn!(%meeting_id, %user_id, "direct response quota exceeded");
                return Err(FacilitationError::DirectResponseLimitExceeded {
                    meeting: meeting_id,
                    user: user_id,
                }
                .into());
            }
        }

        let waiting = self
            .queue
            .items_with_status(meeting_id, QueueItemStatus::Waiting)
            .await?;
        if waiting.iter().any(|item| item.user_id == user_id) {
            return Err(FacilitationError::AlreadyWaiting {
                meeting: meeting_id,
                user: user_id,
            }
            .into());
        }

        let item = QueueItem::new(meeting_id, user_id, kind, tags, now);
        self.queue.insert_item(item.clone()).await?;
        info!(%meeting_id, %user_id, item = %item.id, %kind, "joined the stack");
        Ok(item)
    }

    /// Remove a waiting item, recording who removed it and why.
    ///
    /// The item's owner may remove their own request; a facilitator may
    /// remove anyone's.
    pub async fn remove(
        &self,
        item_id: QueueItemId,
        requesting_user: UserId,
        reason: impl Into<String>,
    ) -> Result<QueueItem, QueueError> {
        let mut item = self.find_item(item_id).await?;

        if item.user_id != requesting_user {
            require_facilitator::<_, QueueError>(&*self.meetings, item.meeting_id, requesting_user)
                .await?;
        }
        if !item.is_waiting() {
            return Err(FacilitationError::InvalidTransition {
                item: item_id,
                status: item.status.as_str(),
                action: "removed",
            }
            .into());
        }

        item.skip(requesting_user, reason.into(), self.clock.now());
        self.queue.update_item(item.clone()).await?;
        info!(meeting = %item.meeting_id, item = %item_id, by = %requesting_user, "removed from the stack");
        Ok(item)
    }

    /// Give the floor to a waiting item (facilitator only).
    ///
    /// First transitions every currently speaking item in the meeting to
    /// done, then starts the target — the single-active-speaker invariant
    /// holds by construction, not by a separate check.
    pub async fn start_speaking(
        &self,
        item_id: QueueItemId,
        facilitator_id: UserId,
    ) -> Result<QueueItem, QueueError> {
        let mut item = self.find_item(item_id).await?;
        require_facilitator::<_, QueueError>(&*self.meetings, item.meeting_id, facilitator_id)
            .await?;
        if !item.is_waiting() {
            return Err(FacilitationError::InvalidTransition {
                item: item_id,
                status: item.status.as_str(),
                action: "started",
            }
            .into());
        }

        let now = self.clock.now();
        let speaking = self
            .queue
            .items_with_status(item.meeting_id, QueueItemStatus::Speaking)
            .await?;
        for mut current in speaking {
            current.finish_speaking(now);
            self.queue.update_item(current).await?;
        }

        item.start_speaking(now);
        self.queue.update_item(item.clone()).await?;
        info!(meeting = %item.meeting_id, item = %item_id, speaker = %item.user_id, "speaker started");
        Ok(item)
    }

    /// End the current turn for an item (facilitator only).
    pub async fn end_speaking(
        &self,
        item_id: QueueItemId,
        facilitator_id: UserId,
    ) -> Result<QueueItem, QueueError> {
        let mut item = self.find_item(item_id).await?;
        require_facilitator::<_, QueueError>(&*self.meetings, item.meeting_id, facilitator_id)
            .await?;
        if !item.is_speaking() {
            return Err(FacilitationError::InvalidTransition {
                item: item_id,
                status: item.status.as_str(),
                action: "ended",
            }
            .into());
        }

        item.finish_speaking(self.clock.now());
        self.queue.update_item(item.clone()).await?;
        info!(meeting = %item.meeting_id, item = %item_id, speaker = %item.user_id, "speaker finished");
        Ok(item)
    }

    /// Record a manual-reorder request (facilitator only).
    ///
    /// Advisory metadata: the ordering engine recomputes order from scratch
    /// on every read and does not consult these annotations.
    pub async fn reorder(
        &self,
        item_id: QueueItemId,
        facilitator_id: UserId,
        new_position: usize,
        reason: impl Into<String>,
    ) -> Result<QueueItem, QueueError> {
        let mut item = self.find_item(item_id).await?;
        require_facilitator::<_, QueueError>(&*self.meetings, item.meeting_id, facilitator_id)
            .await?;

        item.note_reorder(facilitator_id, new_position, reason.into(), self.clock.now());
        self.queue.update_item(item.clone()).await?;
        info!(meeting = %item.meeting_id, item = %item_id, new_position, "reorder noted");
        Ok(item)
    }

    async fn find_item(&self, id: QueueItemId) -> Result<QueueItem, QueueError> {
        self.queue
            .find_item(id)
            .await?
            .ok_or_else(|| FacilitationError::QueueItemNotFound(id).into())
    }
}
