//! Incident-report domain entities
//!
//! Participants can flag safety or conduct problems during a meeting,
//! optionally anonymously. Reports are only readable by facilitators;
//! anonymous reports never store the reporter at all, so no later read
//! path can leak it.

use crate::core::ids::{IncidentId, MeetingId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Handling state of an incident report.
///
/// Urgent reports skip straight to `Investigating`; everything else starts
/// `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncidentStatus {
    Open,
    Investigating,
    Resolved,
    Dismissed,
}

impl IncidentStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, IncidentStatus::Resolved | IncidentStatus::Dismissed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IncidentStatus::Open => "open",
            IncidentStatus::Investigating => "investigating",
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::Dismissed => "dismissed",
        }
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One facilitator status change, kept as an append-only history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: IncidentStatus,
    pub by: UserId,
    pub notes: Option<String>,
    pub at: DateTime<Utc>,
}

/// A reported safety or conduct problem (Entity).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncidentReport {
    pub id: IncidentId,
    pub meeting_id: MeetingId,
    /// `None` for anonymous reports. The reporter is dropped at creation,
    /// not filtered at read time.
    pub reporter_id: Option<UserId>,
    /// Reporter-chosen category ("harassment", "accessibility", ...).
    pub category: String,
    pub description: String,
    pub urgent: bool,
    pub status: IncidentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
}

impl IncidentReport {
    /// Create a new report. Urgent reports open under investigation;
    /// anonymous reports never record the reporter.
    pub fn new(
        meeting_id: MeetingId,
        reporter_id: UserId,
        category: impl Into<String>,
        description: impl Into<String>,
        urgent: bool,
        anonymous: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: IncidentId::generate(),
            meeting_id,
            reporter_id: (!anonymous).then_some(reporter_id),
            category: category.into(),
            description: description.into(),
            urgent,
            status: if urgent {
                IncidentStatus::Investigating
            } else {
                IncidentStatus::Open
            },
            created_at,
            status_history: Vec::new(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.reporter_id.is_none()
    }

    /// Move to a new status, appending to the history.
    pub fn set_status(
        &mut self,
        status: IncidentStatus,
        by: UserId,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) {
        self.status = status;
        self.status_history.push(StatusChange {
            status,
            by,
            notes,
            at: now,
        });
    }
}

/// Aggregated counts over a meeting's incident reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentStats {
    pub total: usize,
    pub urgent: usize,
    pub by_status: BTreeMap<&'static str, usize>,
}

impl IncidentStats {
    pub fn from_reports(reports: &[IncidentReport]) -> Self {
        let mut stats = IncidentStats {
            total: reports.len(),
            ..IncidentStats::default()
        };
        for report in reports {
            if report.urgent {
                stats.urgent += 1;
            }
            *stats.by_status.entry(report.status.as_str()).or_insert(0) += 1;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(urgent: bool, anonymous: bool) -> IncidentReport {
        IncidentReport::new(
            MeetingId::generate(),
            UserId::generate(),
            "harassment",
            "interrupted repeatedly",
            urgent,
            anonymous,
            Utc::now(),
        )
    }

    #[test]
    fn test_urgent_report_opens_under_investigation() {
        assert_eq!(report(true, false).status, IncidentStatus::Investigating);
        assert_eq!(report(false, false).status, IncidentStatus::Open);
    }

    #[test]
    fn test_anonymous_report_never_stores_the_reporter() {
        let anonymous = report(false, true);
        assert!(anonymous.is_anonymous());
        assert!(anonymous.reporter_id.is_none());

        let named = report(false, false);
        assert!(named.reporter_id.is_some());
    }

    #[test]
    fn test_status_changes_append_to_history() {
        let mut incident = report(false, false);
        let facilitator = UserId::generate();
        incident.set_status(
            IncidentStatus::Investigating,
            facilitator,
            Some("talked to both sides".into()),
            Utc::now(),
        );
        incident.set_status(IncidentStatus::Resolved, facilitator, None, Utc::now());

        assert_eq!(incident.status, IncidentStatus::Resolved);
        assert!(incident.status.is_closed());
        assert_eq!(incident.status_history.len(), 2);
        assert_eq!(incident.status_history[0].status, IncidentStatus::Investigating);
    }

    #[test]
    fn test_stats_count_totals_urgency_and_status() {
        let mut resolved = report(false, false);
        resolved.set_status(IncidentStatus::Resolved, UserId::generate(), None, Utc::now());
        let reports = vec![report(true, false), report(false, true), resolved];

        let stats = IncidentStats::from_reports(&reports);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.urgent, 1);
        assert_eq!(stats.by_status.get("investigating"), Some(&1));
        assert_eq!(stats.by_status.get("open"), Some(&1));
        assert_eq!(stats.by_status.get("resolved"), Some(&1));
    }

    #[test]
    fn test_empty_stats() {
        assert_eq!(IncidentStats::from_reports(&[]), IncidentStats::default());
    }
}
