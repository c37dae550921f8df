//! Proposal and vote domain entities

use crate::core::ids::{MeetingId, ProposalId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a proposal.
///
/// `Active` is the sole initial state. The other three are terminal under
/// the automatic consensus rules; only a facilitator override can move a
/// proposal out of them (including back to `Active`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalStatus {
    Active,
    Passed,
    Blocked,
    Withdrawn,
}

impl ProposalStatus {
    pub fn is_decided(&self) -> bool {
        !matches!(self, ProposalStatus::Active)
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProposalStatus::Active => "active",
            ProposalStatus::Passed => "passed",
            ProposalStatus::Blocked => "blocked",
            ProposalStatus::Withdrawn => "withdrawn",
        };
        write!(f, "{}", name)
    }
}

/// How a participant stands on a proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteType {
    /// Supports the proposal.
    Agree,
    /// Won't stand in the way; counts toward passing.
    StandAside,
    /// Non-blocking objection, recorded for the minutes.
    Concern,
    /// Unilateral veto. A single block decides the proposal.
    Block,
}

/// A group decision under consideration (Entity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub meeting_id: MeetingId,
    pub proposer_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub status: ProposalStatus,
    pub created_at: DateTime<Utc>,
    /// Set exactly once when status leaves `Active`, by automatic
    /// resolution, withdrawal, or manual override.
    pub decided_at: Option<DateTime<Utc>>,
}

impl Proposal {
    pub fn new(
        meeting_id: MeetingId,
        proposer_id: UserId,
        title: impl Into<String>,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ProposalId::generate(),
            meeting_id,
            proposer_id,
            title: title.into(),
            description,
            status: ProposalStatus::Active,
            created_at,
            decided_at: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == ProposalStatus::Active
    }

    /// Move to a decided status, stamping the decision time.
    pub fn decide(&mut self, status: ProposalStatus, now: DateTime<Utc>) {
        debug_assert!(status.is_decided());
        self.status = status;
        self.decided_at = Some(now);
    }

    /// Reopen a decided proposal. Facilitator override only.
    pub fn reopen(&mut self) {
        self.status = ProposalStatus::Active;
        self.decided_at = None;
    }
}

/// One participant's vote on a proposal (Entity, keyed by proposal + user).
///
/// At most one vote per user per proposal; recasting overwrites in place and
/// refreshes `cast_at`. No vote history is kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub proposal_id: ProposalId,
    pub user_id: UserId,
    pub vote: VoteType,
    pub rationale: Option<String>,
    pub cast_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        proposal_id: ProposalId,
        user_id: UserId,
        vote: VoteType,
        rationale: Option<String>,
        cast_at: DateTime<Utc>,
    ) -> Self {
        Self {
            proposal_id,
            user_id,
            vote,
            rationale,
            cast_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal() -> Proposal {
        Proposal::new(
            MeetingId::generate(),
            UserId::generate(),
            "Adopt the new budget",
            None,
            Utc::now(),
        )
    }

    #[test]
    fn test_new_proposal_is_active_and_undecided() {
        let proposal = proposal();
        assert!(proposal.is_active());
        assert!(proposal.decided_at.is_none());
    }

    #[test]
    fn test_decide_stamps_decision_time() {
        let mut proposal = proposal();
        let now = Utc::now();
        proposal.decide(ProposalStatus::Passed, now);
        assert_eq!(proposal.status, ProposalStatus::Passed);
        assert_eq!(proposal.decided_at, Some(now));
    }

    #[test]
    fn test_reopen_clears_decision_time() {
        let mut proposal = proposal();
        proposal.decide(ProposalStatus::Blocked, Utc::now());
        proposal.reopen();
        assert!(proposal.is_active());
        assert!(proposal.decided_at.is_none());
    }

    #[test]
    fn test_only_active_is_undecided() {
        assert!(!ProposalStatus::Active.is_decided());
        assert!(ProposalStatus::Passed.is_decided());
        assert!(ProposalStatus::Blocked.is_decided());
        assert!(ProposalStatus::Withdrawn.is_decided());
    }
}
