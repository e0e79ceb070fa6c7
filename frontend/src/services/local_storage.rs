//! `window.localStorage` as a [`KeyValueStore`].

use super::describe_js_error;
use labsample_shared::{KeyValueStore, StorageError};
use wasm_bindgen::JsValue;

const QUOTA_ERROR_NAMES: &[&str] = &["QuotaExceededError", "NS_ERROR_DOM_QUOTA_REACHED"];

pub struct BrowserStorage {
    storage: web_sys::Storage,
}

impl BrowserStorage {
    /// The page's `localStorage`; fails when storage is disabled or blocked
    pub fn local() -> Result<Self, StorageError> {
        let storage = gloo::utils::window()
            .local_storage()
            .map_err(|e| StorageError::Access(describe_js_error(&e)))?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

fn access_error(err: JsValue) -> StorageError {
    StorageError::Access(describe_js_error(&err))
}

fn write_error(key: &str, err: JsValue) -> StorageError {
    let name = js_sys::Reflect::get(&err, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string());

    match name {
        Some(name) if QUOTA_ERROR_NAMES.contains(&name.as_str()) => StorageError::QuotaExceeded {
            key: key.to_string(),
        },
        _ => access_error(err),
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(access_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|e| write_error(key, e))
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(access_error)
    }
}
