//! Meeting aggregate: settings, participants, roles.

pub mod entities;
pub mod repository;

pub use entities::{Meeting, MeetingSettings, Participant, Role};
pub use repository::MeetingRepository;
