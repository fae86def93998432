//! Browser-side preference storage.

use seat_core::error::{SeatError, SeatResult};
use seat_core::preference::{KeyValueStore, MemoryStore};
use wasm_bindgen::JsValue;

/// `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> SeatResult<web_sys::Storage> {
        let window = web_sys::window().ok_or_else(|| SeatError::storage("no window"))?;
        window
            .local_storage()
            .map_err(js_error)?
            .ok_or_else(|| SeatError::storage("localStorage is unavailable"))
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> SeatResult<Option<String>> {
        Self::storage()?.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> SeatResult<()> {
        Self::storage()?.set_item(key, value).map_err(js_error)
    }
}

fn js_error(err: JsValue) -> SeatError {
    SeatError::storage(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

/// The store a canvas persists its preference in: `localStorage` in the
/// browser, memory elsewhere.
#[derive(Debug, Clone)]
pub enum BrowserStore {
    Local(LocalStorageStore),
    Memory(MemoryStore),
}

impl Default for BrowserStore {
    fn default() -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::Local(LocalStorageStore)
        } else {
            Self::Memory(MemoryStore::default())
        }
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> SeatResult<Option<String>> {
        match self {
            Self::Local(s) => s.get(key),
            Self::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> SeatResult<()> {
        match self {
            Self::Local(s) => s.set(key, value),
            Self::Memory(s) => s.set(key, value),
        }
    }
}
