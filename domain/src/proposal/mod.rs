//! Proposal aggregate: consensus votes and decision evaluation.

pub mod consensus;
pub mod entities;
pub mod repository;

pub use consensus::{evaluate_votes, ConsensusOutcome, VoteTally};
pub use entities::{Proposal, ProposalStatus, Vote, VoteType};
pub use repository::ProposalRepository;
