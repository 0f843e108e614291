//! In-memory storage backend

use crate::error::StoreError;
use crate::storage::{validate_key, Batch, Storage, Write};
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Volatile store backed by a map behind a read-write lock
///
/// A batch is applied under a single write lock, so readers observe either
/// none or all of it.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    inner: RwLock<BTreeMap<String, String>>,
}

impl MemoryStorage {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the store holds no keys
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Copy of the full contents
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.inner.read().clone()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        validate_key(key)?;
        Ok(self.inner.read().get(key).cloned())
    }

    fn commit(&self, batch: Batch) -> Result<(), StoreError> {
        for key in batch.keys() {
            validate_key(key)?;
        }

        let mut guard = self.inner.write();
        for (key, write) in batch {
            match write {
                Write::Put(value) => {
                    guard.insert(key, value);
                }
                Write::Delete => {
                    guard.remove(&key);
                }
            }
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.inner.write().clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryStorage::new();
        store.set("trd_config_v2", "{}".to_string()).unwrap();
        assert_eq!(store.get("trd_config_v2").unwrap().as_deref(), Some("{}"));

        store.remove("trd_config_v2").unwrap();
        assert_eq!(store.get("trd_config_v2").unwrap(), None);
        assert!(store.is_empty());
    }

    #[test]
    fn invalid_key_rejects_whole_batch() {
        let store = MemoryStorage::new();
        let mut batch = Batch::new();
        batch.put("good_key", "1").put("Bad Key", "2");

        assert!(store.commit(batch).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn clear_drops_everything() {
        let store = MemoryStorage::new();
        let mut batch = Batch::new();
        batch.put("a", "1").put("b", "2");
        store.commit(batch).unwrap();
        assert_eq!(store.len(), 2);

        store.clear().unwrap();
        assert!(store.snapshot().is_empty());
    }
}
