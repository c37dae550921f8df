//! Incident reporting use cases
//!
//! Anyone can file a report against an existing meeting, optionally
//! anonymously; reading, triaging, and stats are facilitator-only.
//! Filing returns only the report id and status so the caller's response
//! can't echo reporter details back out.

use crate::ports::clock::Clock;
use crate::use_cases::shared::require_facilitator;
use stackline_domain::{
    FacilitationError, IncidentId, IncidentReport, IncidentRepository, IncidentStats,
    IncidentStatus, MeetingId, MeetingRepository, RepositoryError, UserId,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised by incident operations.
#[derive(Error, Debug)]
pub enum IncidentError {
    #[error(transparent)]
    Domain(#[from] FacilitationError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Minimal acknowledgement returned to the reporter.
#[derive(Debug, Clone)]
pub struct IncidentReceipt {
    pub id: IncidentId,
    pub status: IncidentStatus,
}

/// Incident reporting and triage service.
pub struct IncidentService<I, M> {
    incidents: Arc<I>,
    meetings: Arc<M>,
    clock: Arc<dyn Clock>,
}

impl<I, M> IncidentService<I, M>
where
    I: IncidentRepository,
    M: MeetingRepository,
{
    pub fn new(incidents: Arc<I>, meetings: Arc<M>, clock: Arc<dyn Clock>) -> Self {
        Self {
            incidents,
            meetings,
            clock,
        }
    }

    /// File a report. The meeting must exist; no participant check, so
    /// someone who already left can still report.
    pub async fn report(
        &self,
        meeting_id: MeetingId,
        reporter_id: UserId,
        category: impl Into<String>,
        description: impl Into<String>,
        urgent: bool,
        anonymous: bool,
    ) -> Result<IncidentReceipt, IncidentError> {
        self.meetings
            .find_meeting(meeting_id)
            .await?
            .ok_or(FacilitationError::MeetingNotFound(meeting_id))?;

        let incident = IncidentReport::new(
            meeting_id,
            reporter_id,
            category,
            description,
            urgent,
            anonymous,
            self.clock.now(),
        );
        self.incidents.insert_incident(incident.clone()).await?;

        if urgent {
            warn!(%meeting_id, incident = %incident.id, "urgent incident reported, facilitators should be alerted");
        } else {
            info!(%meeting_id, incident = %incident.id, "incident reported");
        }

        Ok(IncidentReceipt {
            id: incident.id,
            status: incident.status,
        })
    }

    /// All reports for a meeting, newest first (facilitator only).
    pub async fn list(
        &self,
        meeting_id: MeetingId,
        facilitator_id: UserId,
    ) -> Result<Vec<IncidentReport>, IncidentError> {
        require_facilitator::<_, IncidentError>(&*self.meetings, meeting_id, facilitator_id)
            .await?;
        Ok(self.incidents.incidents_for_meeting(meeting_id).await?)
    }

    /// Move a report to a new status, with optional notes (facilitator
    /// only).
    pub async fn set_status(
        &self,
        incident_id: IncidentId,
        facilitator_id: UserId,
        status: IncidentStatus,
        notes: Option<String>,
    ) -> Result<IncidentReport, IncidentError> {
        let mut incident = self
            .incidents
            .find_incident(incident_id)
            .await?
            .ok_or(FacilitationError::IncidentNotFound(incident_id))?;
        require_facilitator::<_, IncidentError>(
            &*self.meetings,
            incident.meeting_id,
            facilitator_id,
        )
        .await?;

        incident.set_status(status, facilitator_id, notes, self.clock.now());
        self.incidents.update_incident(incident.clone()).await?;
        info!(incident = %incident_id, by = %facilitator_id, %status, "incident status updated");
        Ok(incident)
    }

    /// Aggregated counts over a meeting's reports (facilitator only).
    pub async fn stats(
        &self,
        meeting_id: MeetingId,
        facilitator_id: UserId,
    ) -> Result<IncidentStats, IncidentError> {
        require_facilitator::<_, IncidentError>(&*self.meetings, meeting_id, facilitator_id)
            .await?;
        let reports = self.incidents.incidents_for_meeting(meeting_id).await?;
        Ok(IncidentStats::from_reports(&reports))
    }
}
