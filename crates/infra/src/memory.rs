//! In-memory product record store for tests/dev.

use std::collections::HashMap;
use std::sync::RwLock;

use makerstore_core::{AggregateRoot, ExpectedVersion, Price, ProductId};
use makerstore_workflow::Submission;

use crate::store::{ProductRecordStore, StoreError};

#[derive(Debug, Clone)]
pub(crate) struct Slot {
    pub(crate) record: Submission,
    pub(crate) published: bool,
    pub(crate) sale_price: Option<Price>,
    pub(crate) trashed: bool,
}

/// In-memory store with compare-and-swap saves.
///
/// Not optimized for performance; it exists so the engine and the query
/// layer can be exercised without a real commerce backend.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    pub(crate) slots: RwLock<HashMap<ProductId, Slot>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current sale price of a live listing (test accessor).
    pub fn sale_price(&self, id: ProductId) -> Option<Price> {
        let slots = self.slots.read().ok()?;
        slots.get(&id).and_then(|s| s.sale_price)
    }

    /// Whether the record was moved to trash (test accessor).
    pub fn is_trashed(&self, id: ProductId) -> bool {
        self.slots
            .read()
            .map(|slots| slots.get(&id).is_some_and(|s| s.trashed))
            .unwrap_or(false)
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

impl ProductRecordStore for InMemoryProductStore {
    fn get(&self, id: ProductId) -> Result<Submission, StoreError> {
        let slots = self.slots.read().map_err(|_| poisoned())?;
        match slots.get(&id) {
            Some(slot) if !slot.trashed => Ok(slot.record.clone()),
            _ => Err(StoreError::NotFound),
        }
    }

    fn insert(&self, record: Submission) -> Result<(), StoreError> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        let id = record.id_typed();
        if slots.contains_key(&id) {
            return Err(StoreError::AlreadyExists);
        }
        slots.insert(
            id,
            Slot {
                record,
                published: false,
                sale_price: None,
                trashed: false,
            },
        );
        Ok(())
    }

    fn save(&self, record: Submission, expected: ExpectedVersion) -> Result<(), StoreError> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        let id = record.id_typed();
        let slot = match slots.get_mut(&id) {
            Some(slot) if !slot.trashed => slot,
            _ => return Err(StoreError::NotFound),
        };

        let current = slot.record.version();
        if !expected.matches(current) {
            return Err(StoreError::Conflict(format!(
                "expected {expected:?}, found version {current}"
            )));
        }
        slot.record = record;
        Ok(())
    }

    fn publish(&self, id: ProductId, price: Option<Price>) -> Result<(), StoreError> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        let slot = slots.get_mut(&id).ok_or(StoreError::NotFound)?;
        slot.published = true;
        slot.sale_price = price;
        Ok(())
    }

    fn unpublish(&self, id: ProductId) -> Result<(), StoreError> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        let slot = slots.get_mut(&id).ok_or(StoreError::NotFound)?;
        slot.published = false;
        Ok(())
    }

    fn is_published(&self, id: ProductId) -> Result<bool, StoreError> {
        let slots = self.slots.read().map_err(|_| poisoned())?;
        slots
            .get(&id)
            .map(|s| s.published && !s.trashed)
            .ok_or(StoreError::NotFound)
    }

    fn soft_delete(&self, id: ProductId) -> Result<(), StoreError> {
        let mut slots = self.slots.write().map_err(|_| poisoned())?;
        let slot = slots.get_mut(&id).ok_or(StoreError::NotFound)?;
        slot.trashed = true;
        slot.published = false;
        Ok(())
    }
}
