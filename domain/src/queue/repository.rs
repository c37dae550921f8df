//! Queue item repository trait

use super::entities::{QueueItem, QueueItemStatus};
use crate::core::error::RepositoryError;
use crate::core::ids::{MeetingId, QueueItemId, UserId};
use async_trait::async_trait;

/// Repository trait for speaking-queue items.
///
/// Implementations live in the infrastructure layer. `items_with_status`
/// must return items in insertion order so that the stable sort in the
/// ordering engine preserves arrival order on timestamp ties.
#[async_trait]
pub trait QueueItemRepository: Send + Sync {
    async fn insert_item(&self, item: QueueItem) -> Result<(), RepositoryError>;

    async fn find_item(&self, id: QueueItemId) -> Result<Option<QueueItem>, RepositoryError>;

    /// Replace a stored item record wholesale.
    async fn update_item(&self, item: QueueItem) -> Result<(), RepositoryError>;

    /// All items for a meeting, any status, in insertion order.
    async fn items_for_meeting(
        &self,
        meeting: MeetingId,
    ) -> Result<Vec<QueueItem>, RepositoryError>;

    /// Items for a meeting with the given status, in insertion order.
    async fn items_with_status(
        &self,
        meeting: MeetingId,
        status: QueueItemStatus,
    ) -> Result<Vec<QueueItem>, RepositoryError>;

    /// All items a user has created in a meeting, any status, in insertion
    /// order. Feeds the rate limiter's derived count.
    async fn items_for_user(
        &self,
        meeting: MeetingId,
        user: UserId,
    ) -> Result<Vec<QueueItem>, RepositoryError>;
}
