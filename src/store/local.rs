//! Browser `localStorage` store.

use super::KeyValueStore;
use tracing::warn;
use web_sys::Storage;

/// `window.localStorage` backend. Storage can be absent (sandboxed frames,
/// workers, non-browser hosts) or reject access; both degrade to no-op.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Option<Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = self.storage() {
            if storage.set_item(key, value).is_err() {
                warn!("localStorage rejected write for key {}", key);
            }
        }
    }

    fn delete(&self, key: &str) {
        if let Some(storage) = self.storage() {
            let _ = storage.remove_item(key);
        }
    }
}
