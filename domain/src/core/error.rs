//! Domain error types
//!
//! Every rejected operation maps to one of four kinds — validation,
//! conflict, permission, not-found — so a transport layer can translate
//! errors to status codes without matching individual variants.

use crate::core::ids::{IncidentId, MeetingId, ProposalId, QueueItemId, UserId};
use thiserror::Error;

/// Broad classification of a [`FacilitationError`], for transport mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Permission,
    NotFound,
}

/// Domain-level errors raised by facilitation operations.
#[derive(Error, Debug)]
pub enum FacilitationError {
    #[error("Meeting {0} not found")]
    MeetingNotFound(MeetingId),

    #[error("Meeting {0} is not active")]
    MeetingInactive(MeetingId),

    #[error("Queue item {0} not found")]
    QueueItemNotFound(QueueItemId),

    #[error("User {user} already has a waiting item in meeting {meeting}")]
    AlreadyWaiting { meeting: MeetingId, user: UserId },

    #[error("Direct response limit exceeded for user {user} in meeting {meeting}")]
    DirectResponseLimitExceeded { meeting: MeetingId, user: UserId },

    #[error("Queue item {item} is {status} and cannot be {action}")]
    InvalidTransition {
        item: QueueItemId,
        status: &'static str,
        action: &'static str,
    },

    #[error("Facilitator permission required for user {0}")]
    FacilitatorRequired(UserId),

    #[error("User {user} is not a participant of meeting {meeting}")]
    NotAParticipant { meeting: MeetingId, user: UserId },

    #[error("Only the proposer can withdraw proposal {0}")]
    NotTheProposer(ProposalId),

    #[error("Proposal {0} not found")]
    ProposalNotFound(ProposalId),

    #[error("Proposal {0} is not active")]
    ProposalNotActive(ProposalId),

    #[error("User {user} already joined meeting {meeting}")]
    AlreadyJoined { meeting: MeetingId, user: UserId },

    #[error("No meeting found for PIN {0}")]
    PinNotFound(String),

    #[error("Incident {0} not found")]
    IncidentNotFound(IncidentId),
}

impl FacilitationError {
    /// Classify this error for transport mapping.
    pub fn kind(&self) -> ErrorKind {
        use FacilitationError::*;
        match self {
            MeetingInactive(_) | ProposalNotActive(_) => ErrorKind::Validation,
            AlreadyWaiting { .. }
            | DirectResponseLimitExceeded { .. }
            | InvalidTransition { .. }
            | AlreadyJoined { .. } => ErrorKind::Conflict,
            FacilitatorRequired(_) | NotAParticipant { .. } | NotTheProposer(_) => {
                ErrorKind::Permission
            }
            MeetingNotFound(_)
            | QueueItemNotFound(_)
            | ProposalNotFound(_)
            | PinNotFound(_)
            | IncidentNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Errors surfaced by repository implementations.
///
/// Kept deliberately small: adapters translate their backend failures into
/// `Storage`, and lookups that return nothing use `Option` rather than an
/// error, leaving not-found policy to the use cases.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Storage failure: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_cover_the_taxonomy() {
        let meeting = MeetingId::generate();
        let user = UserId::generate();

        assert_eq!(
            FacilitationError::MeetingInactive(meeting).kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            FacilitationError::AlreadyWaiting { meeting, user }.kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            FacilitationError::FacilitatorRequired(user).kind(),
            ErrorKind::Permission
        );
        assert_eq!(
            FacilitationError::MeetingNotFound(meeting).kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_error_display_names_the_subject() {
        let id = ProposalId::generate();
        let message = FacilitationError::ProposalNotActive(id).to_string();
        assert!(message.contains(&id.to_string()));
    }
}
