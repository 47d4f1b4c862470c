//! `makerstore-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the workflow error model, validated money value
//! objects, and the aggregate execution traits shared by the domain crates.

pub mod aggregate;
pub mod error;
pub mod id;
pub mod money;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot, ExpectedVersion};
pub use error::{DomainError, DomainResult};
pub use id::{FileRef, ProductId, UserId};
pub use money::{Price, RoyaltyPercent, PRICE_SCALE};
pub use value_object::ValueObject;
