//! # Storage
//!
//! JSON persistence on top of a string key/value store. The browser's
//! `localStorage` is one implementation of [`KeyValueStore`]; [`MemoryStore`]
//! is another, used when `localStorage` is unavailable and in tests.
//!
//! [`StorageService`] never surfaces failures to its callers: writes report
//! success as a `bool`, reads fall back to a caller-supplied default. Every
//! failure is logged.

use log::{debug, error};
use serde::{de::DeserializeOwned, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage is unavailable")]
    Unavailable,
    #[error("Storage quota exceeded while writing {key:?}")]
    QuotaExceeded { key: String },
    #[error("Storage access failed: {0}")]
    Access(String),
    #[error("Failed to serialize value: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Failed to parse stored value: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// Synchronous string key/value store with `localStorage` semantics
pub trait KeyValueStore {
    /// Read the raw value stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`; removing an absent key is not an error
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key)
    }
}

/// In-memory store with an optional size quota.
///
/// The quota counts UTF-16 code units of keys plus values, which is how
/// browsers account for `localStorage` usage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<BTreeMap<String, String>>,
    quota: Option<usize>,
    disabled: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            quota: Some(quota),
            ..Self::default()
        }
    }

    /// Make every subsequent access fail as if storage were switched off
    pub fn set_disabled(&self, disabled: bool) {
        self.disabled.set(disabled);
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    fn check_enabled(&self) -> Result<(), StorageError> {
        if self.disabled.get() {
            Err(StorageError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn entry_size(key: &str, value: &str) -> usize {
        key.encode_utf16().count() + value.encode_utf16().count()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_enabled()?;
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_enabled()?;
        let mut items = self.items.borrow_mut();

        if let Some(quota) = self.quota {
            let used: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| Self::entry_size(k, v))
                .sum();
            if used + Self::entry_size(key, value) > quota {
                return Err(StorageError::QuotaExceeded { key: key.to_string() });
            }
        }

        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check_enabled()?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// JSON read/write helpers over a [`KeyValueStore`]
pub struct StorageService<S> {
    store: S,
}

impl<S: KeyValueStore> StorageService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Serialize `data` to JSON and store it under `key`.
    ///
    /// Returns `false` (after logging) when serialization or the write fails.
    pub fn save_to_storage<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> bool {
        match self.try_save(key, data) {
            Ok(()) => {
                debug!("💾 STORAGE: Saved {}", key);
                true
            }
            Err(e) => {
                error!("❌ STORAGE: Error saving to storage: {}", e);
                false
            }
        }
    }

    /// Load and parse the value under `key`, or `default_value` when it is
    /// absent or unreadable.
    pub fn load_from_storage<T: DeserializeOwned>(&self, key: &str, default_value: T) -> T {
        self.try_load(key).unwrap_or(default_value)
    }

    /// Load and parse the value under `key`; `None` when absent or unreadable.
    ///
    /// An empty stored string counts as absent.
    pub fn try_load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.read(key) {
            Ok(value) => value,
            Err(e) => {
                error!("❌ STORAGE: Error loading from storage: {}", e);
                None
            }
        }
    }

    /// Store already-serialized JSON text under `key` as-is.
    ///
    /// Callers that produce JSON themselves (the page's `JSON.stringify`) use
    /// this so the stored text is exactly what they produced.
    pub fn save_raw(&self, key: &str, json: &str) -> bool {
        match self.store.set_item(key, json) {
            Ok(()) => {
                debug!("💾 STORAGE: Saved {}", key);
                true
            }
            Err(e) => {
                error!("❌ STORAGE: Error saving to storage: {}", e);
                false
            }
        }
    }

    /// Stored text under `key`, unparsed; `None` when absent, empty or unreadable
    pub fn load_raw(&self, key: &str) -> Option<String> {
        match self.store.get_item(key) {
            Ok(Some(raw)) if !raw.is_empty() => Some(raw),
            Ok(_) => None,
            Err(e) => {
                error!("❌ STORAGE: Error loading from storage: {}", e);
                None
            }
        }
    }

    /// Delete `key`, returning `false` (after logging) on failure
    pub fn remove_from_storage(&self, key: &str) -> bool {
        match self.store.remove_item(key) {
            Ok(()) => true,
            Err(e) => {
                error!("❌ STORAGE: Error removing {} from storage: {}", key, e);
                false
            }
        }
    }

    fn try_save<T: Serialize + ?Sized>(&self, key: &str, data: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(data).map_err(StorageError::Serialize)?;
        self.store.set_item(key, &json)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.store.get_item(key)? {
            Some(raw) if !raw.is_empty() => serde_json::from_str(&raw)
                .map(Some)
                .map_err(StorageError::Deserialize),
            _ => Ok(None),
        }
    }
}
