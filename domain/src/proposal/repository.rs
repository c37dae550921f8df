//! Proposal and vote repository trait

use super::entities::{Proposal, Vote};
use crate::core::error::RepositoryError;
use crate::core::ids::{MeetingId, ProposalId};
use async_trait::async_trait;

/// Repository trait for proposals and their votes.
///
/// Implementations live in the infrastructure layer. Vote storage is keyed
/// by (proposal, user): `upsert_vote` overwrites any previous vote by the
/// same user on the same proposal.
#[async_trait]
pub trait ProposalRepository: Send + Sync {
    async fn insert_proposal(&self, proposal: Proposal) -> Result<(), RepositoryError>;

    async fn find_proposal(&self, id: ProposalId) -> Result<Option<Proposal>, RepositoryError>;

    /// Replace a stored proposal record wholesale.
    async fn update_proposal(&self, proposal: Proposal) -> Result<(), RepositoryError>;

    /// Proposals for a meeting, newest first.
    async fn proposals_for_meeting(
        &self,
        meeting: MeetingId,
    ) -> Result<Vec<Proposal>, RepositoryError>;

    /// Insert or overwrite the (proposal, user) vote. Last write wins.
    async fn upsert_vote(&self, vote: Vote) -> Result<(), RepositoryError>;

    /// All votes currently recorded for a proposal.
    async fn votes_for_proposal(&self, proposal: ProposalId) -> Result<Vec<Vote>, RepositoryError>;
}
