//! Ports (interfaces) for the application layer.
//!
//! Repository traits live in the domain layer next to their aggregates;
//! here are the cross-cutting concerns the use cases depend on.

pub mod clock;
pub mod event_log;
