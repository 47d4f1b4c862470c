//! Infrastructure layer: collaborator contracts, in-memory adapters, and the
//! request-scoped workflow engine.
//!
//! The domain crates stay pure; everything that talks to the outside world
//! (the product record store, the file store, the notification dispatcher)
//! is a trait here, with in-memory implementations for tests/dev.

pub mod engine;
pub mod files;
pub mod memory;
pub mod notify;
pub mod query;
pub mod store;
