//! External file/attachment store contract.
//!
//! Upload mechanics (multipart handling, size limits, storage paths) are the
//! external store's concern. The workflow only carries the opaque references
//! back for display and audit.

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use makerstore_core::{FileRef, ProductId};

use crate::store::StoreError;

/// A stored attachment, as reported back by the file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub file_ref: FileRef,
    pub filename: String,
}

/// Contract for the external attachment store.
pub trait FileStore: Send + Sync {
    /// Register an uploaded design file against a product; returns the
    /// opaque reference used in audit payloads.
    fn attach(&self, product_id: ProductId, filename: &str) -> Result<FileRef, StoreError>;

    /// All attachments for a product, oldest first.
    fn list(&self, product_id: ProductId) -> Vec<StoredFile>;
}

/// In-memory file store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryFileStore {
    files: RwLock<HashMap<ProductId, Vec<StoredFile>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileStore for InMemoryFileStore {
    fn attach(&self, product_id: ProductId, filename: &str) -> Result<FileRef, StoreError> {
        let mut files = self
            .files
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))?;
        let file_ref = FileRef::new();
        files.entry(product_id).or_default().push(StoredFile {
            file_ref,
            filename: filename.to_string(),
        });
        Ok(file_ref)
    }

    fn list(&self, product_id: ProductId) -> Vec<StoredFile> {
        self.files
            .read()
            .map(|files| files.get(&product_id).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachments_accumulate_per_product() {
        let store = InMemoryFileStore::new();
        let product = ProductId::new();

        let first = store.attach(product, "bracket.stl").unwrap();
        store.attach(product, "bracket.step").unwrap();

        let listed = store.list(product);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].file_ref, first);
        assert_eq!(listed[0].filename, "bracket.stl");
        assert!(store.list(ProductId::new()).is_empty());
    }
}
