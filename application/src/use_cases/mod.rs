//! Facilitation use cases.

pub mod export;
pub mod incidents;
pub mod meetings;
pub mod proposals;
pub mod queue;
pub mod queue_view;
pub mod rate_limit;
mod shared;
