//! Typed accessors over raw storage keys

use crate::error::StoreError;
use crate::storage::{Batch, Storage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

/// A JSON-serialized value of type `T` living under a fixed key
pub struct Record<T> {
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Record<T> {
    /// Bind a record type to a key
    #[inline]
    #[must_use]
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _marker: PhantomData,
        }
    }

    /// Storage key
    #[inline]
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }
}

impl<T> Clone for Record<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Record<T> {}

impl<T> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record").field("key", &self.key).finish()
    }
}

impl<T: Serialize + DeserializeOwned> Record<T> {
    /// Load the value, `None` if the key is absent
    ///
    /// # Errors
    /// - `StoreError::Corrupt` if the stored JSON does not decode as `T`
    /// - backend errors
    pub fn load<S: Storage + ?Sized>(&self, storage: &S) -> Result<Option<T>, StoreError> {
        let Some(raw) = storage.get(self.key)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: self.key.to_string(),
                source,
            })
    }

    /// Load the value, falling back to `default` when absent
    ///
    /// # Errors
    /// Same as [`Record::load`].
    pub fn load_or_else<S, F>(&self, storage: &S, default: F) -> Result<T, StoreError>
    where
        S: Storage + ?Sized,
        F: FnOnce() -> T,
    {
        Ok(self.load(storage)?.unwrap_or_else(default))
    }

    /// Encode the value as it would be stored
    ///
    /// # Errors
    /// `StoreError::Serialize` if encoding fails.
    pub fn encode(&self, value: &T) -> Result<String, StoreError> {
        serde_json::to_string(value).map_err(|source| StoreError::Serialize {
            key: self.key.to_string(),
            source,
        })
    }

    /// Stage the value into a batch
    ///
    /// # Errors
    /// `StoreError::Serialize` if encoding fails.
    pub fn stage(&self, batch: &mut Batch, value: &T) -> Result<(), StoreError> {
        batch.put(self.key, self.encode(value)?);
        Ok(())
    }

    /// Store the value on its own
    ///
    /// # Errors
    /// Encoding or backend failure.
    pub fn store<S: Storage + ?Sized>(&self, storage: &S, value: &T) -> Result<(), StoreError> {
        storage.set(self.key, self.encode(value)?)
    }
}
