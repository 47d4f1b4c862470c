//! `makerstore-auth` — role resolution boundary (zero-trust).
//!
//! This crate is intentionally decoupled from HTTP and storage. It maps an
//! authenticated principal's role labels to a capability set; every workflow
//! operation receives the resolved capabilities explicitly rather than
//! fetching them from ambient context.

pub mod actor;
pub mod capabilities;
pub mod directory;
pub mod roles;

pub use actor::Actor;
pub use capabilities::{resolve_capabilities, Capabilities};
pub use directory::{RoleDirectory, StaticRoleDirectory};
pub use roles::Role;
