//! External product record store contract.
//!
//! The catalog (listing content, storefront publication, trash) is owned by
//! an external commerce platform; the core only reads and writes the
//! workflow record through this interface and signals publication changes.

use thiserror::Error;

use makerstore_core::{ExpectedVersion, Price, ProductId};
use makerstore_workflow::Submission;

/// Store operation error (infrastructure-level).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The product id is unknown (or already trashed).
    #[error("record not found")]
    NotFound,

    /// The persisted version no longer matches the caller's expectation.
    #[error("version conflict: {0}")]
    Conflict(String),

    /// Insert attempted for an id that already has a record.
    #[error("record already exists")]
    AlreadyExists,

    /// Backend failure (lock poisoning, connection loss, ...).
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Contract for the external store holding product workflow records.
///
/// Per-record mutual exclusion is the store's responsibility: `save` is a
/// compare-and-swap on the record version, so two concurrent writers cannot
/// both succeed against a stale read.
pub trait ProductRecordStore: Send + Sync {
    /// Fetch the current record. Its `version()` is the concurrency token
    /// for a later `save`.
    fn get(&self, id: ProductId) -> Result<Submission, StoreError>;

    /// Create the workflow record for a brand-new catalog entry.
    fn insert(&self, record: Submission) -> Result<(), StoreError>;

    /// Replace the record iff the persisted version still matches
    /// `expected`.
    fn save(&self, record: Submission, expected: ExpectedVersion) -> Result<(), StoreError>;

    /// Make the catalog listing purchasable at the given sale price.
    /// A record approved without any price yet goes live unpriced.
    fn publish(&self, id: ProductId, price: Option<Price>) -> Result<(), StoreError>;

    /// Pull the catalog listing from the storefront.
    fn unpublish(&self, id: ProductId) -> Result<(), StoreError>;

    /// Whether the catalog listing is currently live.
    fn is_published(&self, id: ProductId) -> Result<bool, StoreError>;

    /// Move the catalog entry to trash. Eligibility (rejected + archived)
    /// has already been checked by the state machine.
    fn soft_delete(&self, id: ProductId) -> Result<(), StoreError>;
}

impl<S> ProductRecordStore for std::sync::Arc<S>
where
    S: ProductRecordStore + ?Sized,
{
    fn get(&self, id: ProductId) -> Result<Submission, StoreError> {
        (**self).get(id)
    }

    fn insert(&self, record: Submission) -> Result<(), StoreError> {
        (**self).insert(record)
    }

    fn save(&self, record: Submission, expected: ExpectedVersion) -> Result<(), StoreError> {
        (**self).save(record, expected)
    }

    fn publish(&self, id: ProductId, price: Option<Price>) -> Result<(), StoreError> {
        (**self).publish(id, price)
    }

    fn unpublish(&self, id: ProductId) -> Result<(), StoreError> {
        (**self).unpublish(id)
    }

    fn is_published(&self, id: ProductId) -> Result<bool, StoreError> {
        (**self).is_published(id)
    }

    fn soft_delete(&self, id: ProductId) -> Result<(), StoreError> {
        (**self).soft_delete(id)
    }
}
