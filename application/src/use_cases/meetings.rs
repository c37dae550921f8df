//! Meeting lifecycle use cases
//!
//! Thin create/join/leave/settings plumbing around the core: meetings are
//! created with a short join PIN, participants join by PIN with a role, and
//! settings updates replace the whole record.

use crate::ports::clock::Clock;
use crate::use_cases::shared::require_facilitator;
use rand::Rng;
use stackline_domain::{
    FacilitationError, Meeting, MeetingId, MeetingRepository, MeetingSettings, Participant,
    RepositoryError, Role, UserId,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// PIN alphabet: uppercase alphanumerics without lookalikes (0/O, 1/I/L).
const PIN_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const PIN_LENGTH: usize = 6;

/// Errors raised by meeting operations.
#[derive(Error, Debug)]
pub enum MeetingError {
    #[error(transparent)]
    Domain(#[from] FacilitationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Meeting lifecycle service.
pub struct MeetingService<M> {
    meetings: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<M: MeetingRepository> MeetingService<M> {
    pub fn new(meetings: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self { meetings, clock }
    }

    /// Create a meeting with a fresh join PIN. The creator joins as
    /// facilitator.
    pub async fn create(
        &self,
        title: impl Into<String>,
        description: Option<String>,
        settings: MeetingSettings,
        creator: UserId,
    ) -> Result<Meeting, MeetingError> {
        let now = self.clock.now();
        let meeting = Meeting::new(title, description, generate_pin(), settings, now);
        self.meetings.insert_meeting(meeting.clone()).await?;
        self.meetings
            .insert_participant(Participant::new(meeting.id, creator, Role::Facilitator, now))
            .await?;
        info!(meeting = %meeting.id, pin = %meeting.pin, "meeting created");
        Ok(meeting)
    }

    /// Join a meeting by PIN. Rejoining an existing membership is a
    /// conflict.
    pub async fn join(
        &self,
        pin: &str,
        user_id: UserId,
        role: Role,
    ) -> Result<Participant, MeetingError> {
        let meeting = self
            .meetings
            .find_meeting_by_pin(pin)
            .await?
            .ok_or_else(|| FacilitationError::PinNotFound(pin.to_string()))?;

        if self
            .meetings
            .find_participant(meeting.id, user_id)
            .await?
            .is_some()
        {
            return Err(FacilitationError::AlreadyJoined {
                meeting: meeting.id,
                user: user_id,
            }
            .into());
        }

        let participant = Participant::new(meeting.id, user_id, role, self.clock.now());
        self.meetings.insert_participant(participant.clone()).await?;
        info!(meeting = %meeting.id, user = %user_id, ?role, "participant joined");
        Ok(participant)
    }

    /// Leave a meeting; the participant stops counting toward quorum.
    pub async fn leave(
        &self,
        meeting_id: MeetingId,
        user_id: UserId,
    ) -> Result<Participant, MeetingError> {
        let mut participant = self
            .meetings
            .find_participant(meeting_id, user_id)
            .await?
            .ok_or(FacilitationError::NotAParticipant {
                meeting: meeting_id,
                user: user_id,
            })?;

        participant.left_at = Some(self.clock.now());
        self.meetings.update_participant(participant.clone()).await?;
        info!(meeting = %meeting_id, user = %user_id, "participant left");
        Ok(participant)
    }

    /// Replace the meeting settings (facilitator only).
    pub async fn update_settings(
        &self,
        meeting_id: MeetingId,
        facilitator_id: UserId,
        settings: MeetingSettings,
    ) -> Result<Meeting, MeetingError> {
        require_facilitator::<_, MeetingError>(&*self.meetings, meeting_id, facilitator_id).await?;
        let mut meeting = self
            .meetings
            .find_meeting(meeting_id)
            .await?
            .ok_or(FacilitationError::MeetingNotFound(meeting_id))?;

        meeting.settings = settings;
        self.meetings.update_meeting(meeting.clone()).await?;
        info!(meeting = %meeting_id, "settings updated");
        Ok(meeting)
    }

    /// End the meeting (facilitator only). Idempotent.
    pub async fn end(
        &self,
        meeting_id: MeetingId,
        facilitator_id: UserId,
    ) -> Result<Meeting, MeetingError> {
        require_facilitator::<_, MeetingError>(&*self.meetings, meeting_id, facilitator_id).await?;
        let mut meeting = self
            .meetings
            .find_meeting(meeting_id)
            .await?
            .ok_or(FacilitationError::MeetingNotFound(meeting_id))?;

        meeting.end();
        self.meetings.update_meeting(meeting.clone()).await?;
        info!(meeting = %meeting_id, "meeting ended");
        Ok(meeting)
    }
}

fn generate_pin() -> String {
    let mut rng = rand::thread_rng();
    (0..PIN_LENGTH)
        .map(|_| PIN_ALPHABET[rng.gen_range(0..PIN_ALPHABET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_pin_shape() {
        let pin = generate_pin();
        assert_eq!(pin.len(), PIN_LENGTH);
        assert!(pin.bytes().all(|b| PIN_ALPHABET.contains(&b)));
    }
}
