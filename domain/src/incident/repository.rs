//! Incident report repository trait

use super::entities::IncidentReport;
use crate::core::error::RepositoryError;
use crate::core::ids::{IncidentId, MeetingId};
use async_trait::async_trait;

/// Repository trait for incident reports.
///
/// Implementations live in the infrastructure layer.
#[async_trait]
pub trait IncidentRepository: Send + Sync {
    async fn insert_incident(&self, incident: IncidentReport) -> Result<(), RepositoryError>;

    async fn find_incident(
        &self,
        id: IncidentId,
    ) -> Result<Option<IncidentReport>, RepositoryError>;

    /// Replace a stored incident record wholesale.
    async fn update_incident(&self, incident: IncidentReport) -> Result<(), RepositoryError>;

    /// Incident reports for a meeting, newest first.
    async fn incidents_for_meeting(
        &self,
        meeting: MeetingId,
    ) -> Result<Vec<IncidentReport>, RepositoryError>;
}
