//! JSON-file store for native embedders.

use super::KeyValueStore;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Whole-file JSON map at `<root>/<app>/session.json`. The root comes from
/// `WALLET_SESSION_ROOT`, falling back to the platform data directory.
/// I/O failures degrade: reads report absent, writes drop with a warning.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn open(app: &str) -> Self {
        Self { path: store_path(app) }
    }

    /// Store backed by an explicit file path, bypassing root resolution.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> HashMap<String, String> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("store file {} unreadable, treating as empty: {}", self.path.display(), e);
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        }
    }

    fn save(&self, entries: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("store mkdir failed: {}", e);
                return;
            }
        }
        match serde_json::to_string_pretty(entries) {
            Ok(raw) => {
                if let Err(e) = std::fs::write(&self.path, raw) {
                    warn!("store write failed: {}", e);
                }
            }
            Err(e) => warn!("store encode failed: {}", e),
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.load();
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries);
    }

    fn delete(&self, key: &str) {
        let mut entries = self.load();
        if entries.remove(key).is_some() {
            self.save(&entries);
        }
    }
}

fn store_path(app: &str) -> PathBuf {
    let root = std::env::var("WALLET_SESSION_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")));
    root.join(app).join("session.json")
}
