//! `window.localStorage` as the note store's persistence port.

use jotpad_core::{Storage, StorageError};
use wasm_bindgen::JsValue;

/// Implementation of [`Storage`] over the browser's local storage.
///
/// The handle is looked up on every call, so a page that enables storage
/// later (or a private window that never does) is handled per operation.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        LocalStorage
    }

    fn get_local_storage(&self) -> Result<web_sys::Storage, StorageError> {
        match gloo_utils::window().local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err(StorageError::Unavailable(
                "local storage is not available".to_string(),
            )),
            Err(e) => Err(StorageError::Unavailable(js_message(&e))),
        }
    }
}

impl Storage for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let local_storage = self.get_local_storage()?;
        local_storage
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(js_message(&e)))
    }

    fn store(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let local_storage = self.get_local_storage()?;
        local_storage
            .set_item(key, value)
            .map_err(|e| StorageError::WriteRejected(js_message(&e)))
    }
}

/// Best-effort text of a thrown JS value (a `DOMException` for quota errors).
pub(crate) fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            js_sys::Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{value:?}"))
}
