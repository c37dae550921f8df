//! Domain layer for stackline
//!
//! This crate contains the core business logic, entities, and value objects
//! for consensus-meeting facilitation. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## The Stack
//!
//! The stack is the ordered queue of pending speaking requests. Order is
//! recomputed from scratch on every read by a pure comparator, so the same
//! inputs always produce the same order and every position can be explained.
//!
//! ## Progressive Stack
//!
//! Optional priority weighting that favors participants carrying designated
//! invite tags and/or who have not spoken recently, to counter default-FIFO
//! marginalization.
//!
//! ## Consensus
//!
//! Proposals are decided by asynchronous votes: AGREE, STAND_ASIDE, CONCERN,
//! or BLOCK. A single block is decisive; passing requires full participation
//! and a majority of agree + stand-aside.

pub mod core;
pub mod incident;
pub mod meeting;
pub mod ordering;
pub mod proposal;
pub mod queue;

// Re-export commonly used types
pub use crate::core::{
    error::{ErrorKind, FacilitationError, RepositoryError},
    ids::{IncidentId, MeetingId, ProposalId, QueueItemId, UserId},
};
pub use incident::{
    entities::{IncidentReport, IncidentStats, IncidentStatus, StatusChange},
    repository::IncidentRepository,
};
pub use meeting::{
    entities::{Meeting, MeetingSettings, Participant, Role},
    repository::MeetingRepository,
};
pub use ordering::{explain::ordering_reason, stack::StackOrdering};
pub use proposal::{
    consensus::{evaluate_votes, ConsensusOutcome, VoteTally},
    entities::{Proposal, ProposalStatus, Vote, VoteType},
    repository::ProposalRepository,
};
pub use queue::{
    entities::{AuditEntry, QueueItem, QueueItemKind, QueueItemStatus},
    repository::QueueItemRepository,
};
