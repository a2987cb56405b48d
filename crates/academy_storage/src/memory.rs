//! In-memory document store for testing.

use crate::backend::{validate_key, DocumentStore};
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// An in-memory document store.
///
/// Clones share the same documents, so a test can hand one clone to a
/// record store and inspect what was persisted through another.
///
/// An optional capacity limit makes writes fail the way a full browser
/// storage quota or a full disk would.
///
/// # Example
///
/// ```rust
/// use academy_storage::{DocumentStore, InMemoryStore};
///
/// let mut store = InMemoryStore::new();
/// let observer = store.clone();
/// store.write("state", b"test data").unwrap();
/// assert!(observer.contains("state").unwrap());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    documents: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    limit: Arc<RwLock<Option<usize>>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with a pre-existing document.
    ///
    /// Useful for testing load and recovery paths.
    #[must_use]
    pub fn with_document(key: &str, data: Vec<u8>) -> Self {
        let store = Self::new();
        store.documents.write().insert(key.to_string(), data);
        store
    }

    /// Limits the total bytes the store may hold; `None` removes the limit.
    pub fn set_capacity_limit(&self, limit: Option<usize>) {
        *self.limit.write() = limit;
    }

    /// Returns the number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns true if no documents are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl DocumentStore for InMemoryStore {
    fn read(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_key(key)?;
        Ok(self.documents.read().get(key).cloned())
    }

    fn write(&mut self, key: &str, data: &[u8]) -> StorageResult<()> {
        validate_key(key)?;
        let mut documents = self.documents.write();

        if let Some(limit) = *self.limit.read() {
            let others: usize = documents
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len())
                .sum();
            let needed = others + data.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded { needed, limit });
            }
        }

        documents.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.documents.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        assert!(store.read("state").unwrap().is_none());
    }

    #[test]
    fn memory_write_replaces_document() {
        let mut store = InMemoryStore::new();
        store.write("state", b"hello").unwrap();
        store.write("state", b"world").unwrap();

        assert_eq!(store.read("state").unwrap().unwrap(), b"world");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn memory_clones_share_documents() {
        let mut store = InMemoryStore::new();
        let observer = store.clone();
        store.write("state", b"shared").unwrap();
        assert_eq!(observer.read("state").unwrap().unwrap(), b"shared");
    }

    #[test]
    fn memory_with_document() {
        let store = InMemoryStore::with_document("state", b"preloaded".to_vec());
        assert_eq!(store.read("state").unwrap().unwrap(), b"preloaded");
    }

    #[test]
    fn memory_quota_keeps_previous_document() {
        let mut store = InMemoryStore::new();
        store.write("state", b"small").unwrap();
        store.set_capacity_limit(Some(8));

        let result = store.write("state", b"far too large");
        assert!(matches!(
            result,
            Err(StorageError::QuotaExceeded {
                needed: 13,
                limit: 8
            })
        ));
        assert_eq!(store.read("state").unwrap().unwrap(), b"small");

        store.set_capacity_limit(None);
        store.write("state", b"far too large").unwrap();
    }

    #[test]
    fn memory_remove() {
        let mut store = InMemoryStore::new();
        store.write("state", b"data").unwrap();
        store.remove("state").unwrap();
        assert!(store.is_empty());
    }
}
