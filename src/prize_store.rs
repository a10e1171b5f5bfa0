//! Persistence of the prize list.
//!
//! The list is stored as one JSON array under [`STORAGE_KEY`]. Reads never
//! fail (anything unusable yields the default prizes) and writes are
//! best-effort.

use crate::config::STORAGE_KEY;
use crate::Segment;
use log::{debug, info, warn};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No storage backend (e.g. storage disabled by the browser).
    Unavailable,
    /// The backend refused the write, typically quota exceeded.
    Rejected(String),
    Serialize(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unavailable => write!(f, "Local storage is unavailable"),
            StoreError::Rejected(e) => write!(f, "Storage write rejected: {}", e),
            StoreError::Serialize(e) => write!(f, "Failed to serialize prizes: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// String key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

impl LocalStore {
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let storage = Self::storage().ok_or(StoreError::Unavailable)?;
        storage
            .set_item(key, value)
            .map_err(|e| StoreError::Rejected(format!("{:?}", e)))
    }
}

/// In-memory store. Counts writes and can be told to reject them.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
    writes: Cell<usize>,
    reject_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        store
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    pub fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.reject_writes.get() {
            return Err(StoreError::Rejected("quota exceeded".to_string()));
        }
        self.writes.set(self.writes.get() + 1);
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// The eight prizes shown on first launch.
pub fn default_prizes() -> Vec<Segment> {
    vec![
        Segment::new("Chores   ", "#ff6384"),
        Segment::new("Candy   ", "#36a2eb"),
        Segment::new("Prize   ", "#cc65fe"),
        Segment::new("Mystery ???", "#22ab2b"),
        Segment::new("Clean Up   ", "#ffcc00"),
        Segment::new("Mom Picks   ", "#ff9f40"),
        Segment::new("Dad Picks   ", "#4bc0c0"),
        Segment::new("Free Spin   ", "#9966ff"),
    ]
}

pub struct PrizeStore<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> PrizeStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Load the saved prizes, or the defaults if nothing usable is stored.
    pub fn load(&self) -> Vec<Segment> {
        let Some(raw) = self.backend.get(STORAGE_KEY) else {
            debug!("No saved prizes, using defaults");
            return default_prizes();
        };
        match serde_json::from_str::<Vec<Segment>>(&raw) {
            Ok(list) if !list.is_empty() => {
                info!("Loaded {} prizes from storage", list.len());
                list
            }
            Ok(_) => {
                debug!("Saved prize list is empty, using defaults");
                default_prizes()
            }
            Err(e) => {
                warn!("Ignoring malformed saved prizes: {}", e);
                default_prizes()
            }
        }
    }

    /// Persist `segments`. Failures are logged and dropped.
    pub fn save(&self, segments: &[Segment]) {
        if let Err(e) = self.try_save(segments) {
            warn!("{}", e);
        }
    }

    fn try_save(&self, segments: &[Segment]) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(segments).map_err(|e| StoreError::Serialize(e.to_string()))?;
        self.backend.set(STORAGE_KEY, &json)
    }
}
