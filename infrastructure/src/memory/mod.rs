//! In-memory storage adapter.

pub mod store;

pub use store::InMemoryStore;
