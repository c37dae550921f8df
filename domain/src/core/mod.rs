//! Core domain primitives: identifiers and errors.

pub mod error;
pub mod ids;
