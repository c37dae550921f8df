//! Helpers shared between use cases.

use stackline_domain::{
    FacilitationError, Meeting, MeetingId, MeetingRepository, Participant, RepositoryError, UserId,
};

/// Load a meeting, rejecting missing or ended meetings.
pub(crate) async fn require_active_meeting<M, E>(meetings: &M, id: MeetingId) -> Result<Meeting, E>
where
    M: MeetingRepository + ?Sized,
    E: From<FacilitationError> + From<RepositoryError>,
{
    let meeting = meetings
        .find_meeting(id)
        .await?
        .ok_or(FacilitationError::MeetingNotFound(id))?;
    if !meeting.is_active {
        return Err(FacilitationError::MeetingInactive(id).into());
    }
    Ok(meeting)
}

/// Reject callers who do not hold the facilitator role in the meeting.
pub(crate) async fn require_facilitator<M, E>(
    meetings: &M,
    meeting: MeetingId,
    user: UserId,
) -> Result<(), E>
where
    M: MeetingRepository + ?Sized,
    E: From<FacilitationError> + From<RepositoryError>,
{
    let participant = meetings.find_participant(meeting, user).await?;
    match participant {
        Some(p) if p.role.is_facilitator() => Ok(()),
        _ => Err(FacilitationError::FacilitatorRequired(user).into()),
    }
}

/// Load an active (not-left) participant record.
pub(crate) async fn require_active_participant<M, E>(
    meetings: &M,
    meeting: MeetingId,
    user: UserId,
) -> Result<Participant, E>
where
    M: MeetingRepository + ?Sized,
    E: From<FacilitationError> + From<RepositoryError>,
{
    let participant = meetings.find_participant(meeting, user).await?;
    match participant {
        Some(p) if p.is_active() => Ok(p),
        _ => Err(FacilitationError::NotAParticipant { meeting, user }.into()),
    }
}

/// Count of participants who have not left. Consensus quorum is computed
/// over exactly this set.
pub(crate) async fn active_participant_count<M>(
    meetings: &M,
    meeting: MeetingId,
) -> Result<usize, RepositoryError>
where
    M: MeetingRepository + ?Sized,
{
    let participants = meetings.participants(meeting).await?;
    Ok(participants.iter().filter(|p| p.is_active()).count())
}
