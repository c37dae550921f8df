//! Consensus decision evaluation
//!
//! Pure evaluation of a proposal's votes against the consensus rules:
//!
//! - Any block decides the proposal immediately, regardless of how many
//!   participants have voted. A veto is not subject to quorum.
//! - Otherwise, once every active participant has voted, the proposal
//!   passes when agree + stand-aside votes reach at least half of the
//!   active participants (rounded up).
//! - Anything else leaves the proposal pending.
//!
//! The caller supplies a consistent snapshot of votes and the active
//! participant count; this module never touches shared state.

use super::entities::{Vote, VoteType};

/// Outcome of evaluating a proposal's votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsensusOutcome {
    /// A block was cast; the proposal is decided against.
    Blocked,
    /// Full participation and sufficient agreement; the proposal passes.
    Passed,
    /// No decision yet; voting continues.
    Pending,
}

impl ConsensusOutcome {
    pub fn is_decided(&self) -> bool {
        !matches!(self, ConsensusOutcome::Pending)
    }
}

/// Counts of each vote type in a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub agree: usize,
    pub stand_aside: usize,
    pub concern: usize,
    pub block: usize,
}

impl VoteTally {
    pub fn from_votes(votes: &[Vote]) -> Self {
        let mut tally = VoteTally::default();
        for vote in votes {
            match vote.vote {
                VoteType::Agree => tally.agree += 1,
                VoteType::StandAside => tally.stand_aside += 1,
                VoteType::Concern => tally.concern += 1,
                VoteType::Block => tally.block += 1,
            }
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.agree + self.stand_aside + self.concern + self.block
    }

    /// Agree + stand-aside: the votes that count toward passing.
    pub fn supporting(&self) -> usize {
        self.agree + self.stand_aside
    }
}

/// Evaluate a vote snapshot against the active participant count.
pub fn evaluate_votes(votes: &[Vote], active_participants: usize) -> ConsensusOutcome {
    let tally = VoteTally::from_votes(votes);

    if tally.block > 0 {
        return ConsensusOutcome::Blocked;
    }

    // ceil(active / 2) without floating point
    let threshold = active_participants.div_ceil(2);
    if tally.total() == active_participants && tally.supporting() >= threshold {
        return ConsensusOutcome::Passed;
    }

    ConsensusOutcome::Pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{ProposalId, UserId};
    use chrono::Utc;

    fn votes(types: &[VoteType]) -> Vec<Vote> {
        let proposal = ProposalId::generate();
        types
            .iter()
            .map(|&t| Vote::new(proposal, UserId::generate(), t, None, Utc::now()))
            .collect()
    }

    #[test]
    fn test_single_block_decides_immediately() {
        // Only a minority of the 5 active participants has voted
        let snapshot = votes(&[VoteType::Agree, VoteType::Agree, VoteType::Block]);
        assert_eq!(evaluate_votes(&snapshot, 5), ConsensusOutcome::Blocked);
    }

    #[test]
    fn test_full_participation_with_majority_support_passes() {
        // agree + stand_aside = 3 >= ceil(4 * 0.5) = 2
        let snapshot = votes(&[
            VoteType::Agree,
            VoteType::Agree,
            VoteType::StandAside,
            VoteType::Concern,
        ]);
        assert_eq!(evaluate_votes(&snapshot, 4), ConsensusOutcome::Passed);
    }

    #[test]
    fn test_incomplete_participation_stays_pending() {
        let snapshot = votes(&[VoteType::Agree, VoteType::Agree]);
        assert_eq!(evaluate_votes(&snapshot, 4), ConsensusOutcome::Pending);
    }

    #[test]
    fn test_full_participation_without_support_stays_pending() {
        // All voted but only 1 of 4 supports: below ceil(4/2) = 2
        let snapshot = votes(&[
            VoteType::Agree,
            VoteType::Concern,
            VoteType::Concern,
            VoteType::Concern,
        ]);
        assert_eq!(evaluate_votes(&snapshot, 4), ConsensusOutcome::Pending);
    }

    #[test]
    fn test_odd_participant_count_rounds_threshold_up() {
        // ceil(5/2) = 3; two supporters are not enough
        let snapshot = votes(&[
            VoteType::Agree,
            VoteType::StandAside,
            VoteType::Concern,
            VoteType::Concern,
            VoteType::Concern,
        ]);
        assert_eq!(evaluate_votes(&snapshot, 5), ConsensusOutcome::Pending);

        let snapshot = votes(&[
            VoteType::Agree,
            VoteType::StandAside,
            VoteType::Agree,
            VoteType::Concern,
            VoteType::Concern,
        ]);
        assert_eq!(evaluate_votes(&snapshot, 5), ConsensusOutcome::Passed);
    }

    #[test]
    fn test_no_votes_is_pending() {
        assert_eq!(evaluate_votes(&[], 3), ConsensusOutcome::Pending);
    }

    #[test]
    fn test_tally_counts_each_type() {
        let snapshot = votes(&[
            VoteType::Agree,
            VoteType::Agree,
            VoteType::StandAside,
            VoteType::Concern,
            VoteType::Block,
        ]);
        let tally = VoteTally::from_votes(&snapshot);
        assert_eq!(tally.agree, 2);
        assert_eq!(tally.stand_aside, 1);
        assert_eq!(tally.concern, 1);
        assert_eq!(tally.block, 1);
        assert_eq!(tally.total(), 5);
        assert_eq!(tally.supporting(), 3);
    }
}
