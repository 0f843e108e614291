//! Storage trait and write batches
//!
//! A [`Storage`] is a flat map from string keys to serialized values. Every
//! write goes through a [`Batch`] so operations that touch several records
//! land together or not at all.

use crate::error::StoreError;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Pending change to a single key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    /// Replace the value stored under the key
    Put(String),
    /// Remove the key
    Delete,
}

/// Set of writes committed all-or-nothing
///
/// Later writes to the same key replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    writes: BTreeMap<String, Write>,
}

impl Batch {
    /// Create empty batch
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a value for `key`
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.writes.insert(key.into(), Write::Put(value.into()));
        self
    }

    /// Stage removal of `key`
    pub fn delete(&mut self, key: impl Into<String>) -> &mut Self {
        self.writes.insert(key.into(), Write::Delete);
        self
    }

    /// Number of distinct keys touched
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether nothing is staged
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Keys touched by this batch, in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.writes.keys().map(String::as_str)
    }

    /// Staged write for `key`, if any
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Write> {
        self.writes.get(key)
    }
}

impl IntoIterator for Batch {
    type Item = (String, Write);
    type IntoIter = btree_map::IntoIter<String, Write>;

    fn into_iter(self) -> Self::IntoIter {
        self.writes.into_iter()
    }
}

/// Flat key-value store of serialized records
pub trait Storage: Send + Sync + std::fmt::Debug {
    /// Read the raw value stored under `key`
    ///
    /// # Errors
    /// Backend failure (IO, invalid key).
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Apply every write in `batch`, or none of them
    ///
    /// # Errors
    /// Backend failure. No write is visible after an error.
    fn commit(&self, batch: Batch) -> Result<(), StoreError>;

    /// Remove every key
    ///
    /// # Errors
    /// Backend failure.
    fn clear(&self) -> Result<(), StoreError>;

    /// Store a single value
    ///
    /// # Errors
    /// Backend failure.
    fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut batch = Batch::new();
        batch.put(key, value);
        self.commit(batch)
    }

    /// Remove a single key
    ///
    /// # Errors
    /// Backend failure.
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut batch = Batch::new();
        batch.delete(key);
        self.commit(batch)
    }
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn commit(&self, batch: Batch) -> Result<(), StoreError> {
        (**self).commit(batch)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn commit(&self, batch: Batch) -> Result<(), StoreError> {
        (**self).commit(batch)
    }

    fn clear(&self) -> Result<(), StoreError> {
        (**self).clear()
    }
}

/// Keys are restricted to `[a-z0-9_]` so every backend can map them 1:1
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_last_write_wins() {
        let mut batch = Batch::new();
        batch.put("a", "1").put("a", "2").delete("b");

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.get("a"), Some(&Write::Put("2".to_string())));
        assert_eq!(batch.get("b"), Some(&Write::Delete));
    }

    #[test]
    fn batch_keys_are_sorted() {
        let mut batch = Batch::new();
        batch.put("trd_tickets_v2", "[]").put("trd_config_v2", "{}");
        let keys: Vec<_> = batch.keys().collect();
        assert_eq!(keys, vec!["trd_config_v2", "trd_tickets_v2"]);
    }

    #[test]
    fn key_validation() {
        assert!(validate_key("trd_tickets_v2").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("Upper").is_err());
    }
}
