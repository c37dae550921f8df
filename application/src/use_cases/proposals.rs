//! Consensus resolver use cases
//!
//! Owns proposal and vote state. After every vote the proposal is evaluated
//! against a snapshot of all votes and the active participant roster, and
//! auto-resolves to blocked or passed when the consensus rules say so.
//! Manual facilitator overrides are a separate, privileged path that never
//! runs through the automatic rules. Callers serialize vote casting per
//! proposal.

use crate::ports::clock::Clock;
use crate::use_cases::shared::{
    active_participant_count, require_active_meeting, require_active_participant,
    require_facilitator,
};
use stackline_domain::{
    evaluate_votes, ConsensusOutcome, FacilitationError, MeetingId, MeetingRepository, Proposal,
    ProposalId, ProposalRepository, ProposalStatus, RepositoryError, UserId, Vote, VoteType,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised by proposal operations.
#[derive(Error, Debug)]
pub enum ProposalError {
    #[error(transparent)]
    Domain(#[from] FacilitationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Result of casting a vote: the stored vote and where the proposal ended
/// up after evaluation.
#[derive(Debug, Clone)]
pub struct VoteReceipt {
    pub vote: Vote,
    pub proposal_status: ProposalStatus,
}

/// Consensus decision resolver.
pub struct ConsensusResolver<P, M> {
    proposals: Arc<P>,
    meetings: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<P, M> ConsensusResolver<P, M>
where
    P: ProposalRepository,
    M: MeetingRepository,
{
    pub fn new(proposals: Arc<P>, meetings: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            proposals,
            meetings,
            clock,
        }
    }

    /// Put a new proposal before the group.
    pub async fn create_proposal(
        &self,
        meeting_id: MeetingId,
        proposer_id: UserId,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Result<Proposal, ProposalError> {
        require_active_meeting::<_, ProposalError>(&*self.meetings, meeting_id).await?;
        require_active_participant::<_, ProposalError>(&*self.meetings, meeting_id, proposer_id)
            .await?;

        let proposal = Proposal::new(
            meeting_id,
            proposer_id,
            title,
            description,
            self.clock.now(),
        );
        self.proposals.insert_proposal(proposal.clone()).await?;
        info!(%meeting_id, proposal = %proposal.id, proposer = %proposer_id, "proposal created");
        Ok(proposal)
    }

    /// Record (or overwrite) a participant's vote, then evaluate the
    /// proposal against a snapshot of all votes and active participants.
    pub async fn cast_vote(
        &self,
        proposal_id: ProposalId,
        user_id: UserId,
        vote_type: VoteType,
        rationale: Option<String>,
    ) -> Result<VoteReceipt, ProposalError> {
        let mut proposal = self.find_proposal(proposal_id).await?;
        if !proposal.is_active() {
            return Err(FacilitationError::ProposalNotActive(proposal_id).into());
        }
        require_active_participant::<_, ProposalError>(
            &*self.meetings,
            proposal.meeting_id,
            user_id,
        )
        .await?;

        let now = self.clock.now();
        let vote = Vote::new(proposal_id, user_id, vote_type, rationale, now);
        self.proposals.upsert_vote(vote.clone()).await?;

        // Evaluate against a consistent snapshot taken after the write.
        // Write order matters: the vote is the durable fact, the status is
        // derived from it. Should the status update fail after the vote
        // committed, the proposal stays Active with the votes intact and the
        // next cast re-evaluates the same snapshot to the same outcome.
        let votes = self.proposals.votes_for_proposal(proposal_id).await?;
        let active = active_participant_count(&*self.meetings, proposal.meeting_id).await?;

        match evaluate_votes(&votes, active) {
            ConsensusOutcome::Blocked => {
                proposal.decide(ProposalStatus::Blocked, now);
                self.proposals.update_proposal(proposal.clone()).await?;
                warn!(proposal = %proposal_id, by = %user_id, "proposal blocked");
            }
            ConsensusOutcome::Passed => {
                proposal.decide(ProposalStatus::Passed, now);
                self.proposals.update_proposal(proposal.clone()).await?;
                info!(proposal = %proposal_id, votes = votes.len(), "proposal passed");
            }
            ConsensusOutcome::Pending => {
                info!(proposal = %proposal_id, votes = votes.len(), active, "vote recorded");
            }
        }

        Ok(VoteReceipt {
            vote,
            proposal_status: proposal.status,
        })
    }

    /// Withdraw an active proposal (proposer only).
    pub async fn withdraw(
        &self,
        proposal_id: ProposalId,
        user_id: UserId,
    ) -> Result<Proposal, ProposalError> {
        let mut proposal = self.find_proposal(proposal_id).await?;
        if proposal.proposer_id != user_id {
            return Err(FacilitationError::NotTheProposer(proposal_id).into());
        }
        if !proposal.is_active() {
            return Err(FacilitationError::ProposalNotActive(proposal_id).into());
        }

        proposal.decide(ProposalStatus::Withdrawn, self.clock.now());
        self.proposals.update_proposal(proposal.clone()).await?;
        info!(proposal = %proposal_id, "proposal withdrawn");
        Ok(proposal)
    }

    /// Facilitator override: force any status, including reopening a
    /// decided proposal. This is the explicit escape hatch outside the
    /// automatic rules; automatic resolution never reopens.
    pub async fn set_status(
        &self,
        proposal_id: ProposalId,
        facilitator_id: UserId,
        status: ProposalStatus,
    ) -> Result<Proposal, ProposalError> {
        let mut proposal = self.find_proposal(proposal_id).await?;
        require_facilitator::<_, ProposalError>(
            &*self.meetings,
            proposal.meeting_id,
            facilitator_id,
        )
        .await?;

        if status == ProposalStatus::Active {
            proposal.reopen();
        } else {
            proposal.decide(status, self.clock.now());
        }
        self.proposals.update_proposal(proposal.clone()).await?;
        info!(proposal = %proposal_id, by = %facilitator_id, %status, "status overridden");
        Ok(proposal)
    }

    async fn find_proposal(&self, id: ProposalId) -> Result<Proposal, ProposalError> {
        self.proposals
            .find_proposal(id)
            .await?
            .ok_or_else(|| FacilitationError::ProposalNotFound(id).into())
    }
}
