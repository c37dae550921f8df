//! Incident aggregate: safety reports, status lifecycle, stats.

pub mod entities;
pub mod repository;

pub use entities::{IncidentReport, IncidentStats, IncidentStatus, StatusChange};
pub use repository::IncidentRepository;
