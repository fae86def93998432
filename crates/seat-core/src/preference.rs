//! Persisted layout preference.
//!
//! The chosen format is kept under one fixed key in a client-local
//! key-value store. Backends implement [`KeyValueStore`]; the engine only
//! ever talks to [`LayoutPreference`].

use crate::error::{SeatError, SeatResult};
use crate::model::LayoutFormat;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Storage key of the persisted format tag.
pub const PREFERENCE_KEY: &str = "seating-layout-preference";

/// Narrow read/write interface over a durable key-value mechanism.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> SeatResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> SeatResult<()>;
}

/// Volatile store, for tests and preview canvases.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> SeatResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> SeatResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A JSON object on disk, rewritten whole on every `set`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> SeatResult<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> SeatResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> SeatResult<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

/// The layout preference on top of some store.
#[derive(Debug, Clone, Default)]
pub struct LayoutPreference<S> {
    store: S,
}

impl<S: KeyValueStore> LayoutPreference<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The last persisted format, if any.
    ///
    /// An unreadable store or an unknown tag is logged and treated as
    /// "nothing stored".
    pub fn stored(&self) -> Option<LayoutFormat> {
        let raw = match self.store.get(PREFERENCE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("could not read layout preference: {e}");
                return None;
            }
        };
        match raw.parse() {
            Ok(format) => Some(format),
            Err(e) => {
                log::warn!("ignoring stored layout preference: {e}");
                None
            }
        }
    }

    /// Initial format: the host's forced format, else the stored
    /// preference, else `suggested`.
    pub fn load(&self, forced: Option<LayoutFormat>, suggested: LayoutFormat) -> LayoutFormat {
        forced.or_else(|| self.stored()).unwrap_or(suggested)
    }

    /// Persist `format`. `Ok` lets the caller show a confirmation.
    pub fn save(&mut self, format: LayoutFormat) -> SeatResult<()> {
        self.store
            .set(PREFERENCE_KEY, format.as_str())
            .map_err(|e| match e {
                SeatError::Storage(_) => e,
                other => SeatError::storage(other.to_string()),
            })?;
        log::debug!("saved layout preference {format}");
        Ok(())
    }
}
