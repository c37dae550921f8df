//! Meeting repository trait

use super::entities::{Meeting, Participant};
use crate::core::error::RepositoryError;
use crate::core::ids::{MeetingId, UserId};
use async_trait::async_trait;

/// Repository trait for meetings and their participants.
///
/// This is a domain-level abstraction; implementations live in the
/// infrastructure layer. Lookups return `Option` — not-found policy is the
/// caller's decision, not the store's.
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    async fn insert_meeting(&self, meeting: Meeting) -> Result<(), RepositoryError>;

    async fn find_meeting(&self, id: MeetingId) -> Result<Option<Meeting>, RepositoryError>;

    async fn find_meeting_by_pin(&self, pin: &str) -> Result<Option<Meeting>, RepositoryError>;

    /// Replace a stored meeting record wholesale.
    async fn update_meeting(&self, meeting: Meeting) -> Result<(), RepositoryError>;

    async fn insert_participant(&self, participant: Participant) -> Result<(), RepositoryError>;

    async fn find_participant(
        &self,
        meeting: MeetingId,
        user: UserId,
    ) -> Result<Option<Participant>, RepositoryError>;

    async fn update_participant(&self, participant: Participant) -> Result<(), RepositoryError>;

    /// All participants of a meeting, including those who have left.
    async fn participants(&self, meeting: MeetingId) -> Result<Vec<Participant>, RepositoryError>;
}
