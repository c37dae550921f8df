//! Stack ordering engine
//!
//! Pure, deterministic ordering of waiting queue items plus human-readable
//! explanations derived from the same signals. Both are functions of the
//! meeting settings and an explicit recent-speakers set; no hidden state.

pub mod explain;
pub mod stack;

pub use explain::ordering_reason;
pub use stack::StackOrdering;
