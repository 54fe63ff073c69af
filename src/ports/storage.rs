//! Persistent key-value storage port
//!
//! Used solely for the hiscore. Persistence is best-effort: a missing or
//! failing backend is logged and ignored, the in-memory value stays
//! authoritative for the session.

use std::collections::HashMap;

/// Minimal key-value store surface (LocalStorage shaped)
pub trait StoragePort {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
}

/// In-memory fallback store; also the default for native builds and tests
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }
}

/// Browser LocalStorage backend
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl StoragePort for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten()?;
        storage.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten();
        match storage {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    log::warn!("LocalStorage write failed for key '{key}'");
                }
            }
            None => log::warn!("LocalStorage unavailable, '{key}' not persisted"),
        }
    }
}
