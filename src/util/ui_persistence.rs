//! Durable storage slot for the identity snapshot.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session store writes the last confirmed identity here so the next page
//! load can render an optimistic UI before the server answers. Storage is
//! best effort: quota errors, private browsing and non-browser builds all
//! degrade to "nothing stored" rather than failing.

#[cfg(test)]
#[path = "ui_persistence_test.rs"]
mod ui_persistence_test;

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A string-keyed slot store. Values are opaque serialized blobs.
pub trait SnapshotStorage {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, raw: &str);
    fn remove(&self, key: &str);
}

/// Load and parse a JSON value from `storage`. A blob that does not parse
/// into `T` is removed and `None` is returned.
pub fn load_json<T: DeserializeOwned>(storage: &dyn SnapshotStorage, key: &str) -> Option<T> {
    let raw = storage.load(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            leptos::logging::warn!("discarding unreadable stored value for {key}: {e}");
            storage.remove(key);
            None
        }
    }
}

/// Serialize `value` as JSON into `storage`.
pub fn save_json<T: Serialize>(storage: &dyn SnapshotStorage, key: &str, value: &T) {
    let Ok(raw) = serde_json::to_string(value) else {
        return;
    };
    storage.save(key, &raw);
}

/// Browser `localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl SnapshotStorage for BrowserStorage {
    fn load(&self, key: &str) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            local_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
            None
        }
    }

    fn save(&self, key: &str, raw: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.set_item(key, raw);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = (key, raw);
        }
    }

    fn remove(&self, key: &str) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(key);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = key;
        }
    }
}

/// In-process storage; survives only as long as the value itself. Used for
/// tests and for builds without a browser.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-filled with one slot.
    #[must_use]
    pub fn with(key: &str, raw: &str) -> Self {
        let storage = Self::new();
        storage.save(key, raw);
        storage
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.slots.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, raw: &str) {
        self.slots.borrow_mut().insert(key.to_owned(), raw.to_owned());
    }

    fn remove(&self, key: &str) {
        self.slots.borrow_mut().remove(key);
    }
}
