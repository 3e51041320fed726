//! Settings persistence.
//!
//! The store keeps an in-memory mirror of the settings document behind a
//! `RwLock` and rewrites the JSON file wholesale on every mutation. A
//! missing or corrupt file falls back to defaults so the relay always
//! starts (fail-open); the broken file is only overwritten on the next
//! mutation.

use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{info, warn};

use super::Settings;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Mutex-guarded in-memory mirror of the settings document, flushed to
/// disk on mutation.
pub struct SettingsStore {
    path: PathBuf,
    current: RwLock<Settings>,
}

impl SettingsStore {
    /// Load the settings document from `path`, falling back to defaults
    /// when the file is absent or unreadable.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let settings = Self::read_file(&path);
        Self {
            path,
            current: RwLock::new(settings),
        }
    }

    fn read_file(path: &Path) -> Settings {
        match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(settings) => {
                    info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    warn!("Invalid settings file {}: {e}, using defaults", path.display());
                    Settings::default()
                }
            },
            Err(e) => {
                warn!(
                    "Could not read settings file {}: {e}, using defaults",
                    path.display()
                );
                Settings::default()
            }
        }
    }

    /// Clone the current document. Each message is evaluated against the
    /// snapshot taken at its arrival.
    pub fn snapshot(&self) -> Settings {
        self.current.read().clone()
    }

    /// Mutate the document and flush it to disk.
    pub fn update<F>(&self, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.current.write();
        mutate(&mut guard);
        let json = serde_json::to_string_pretty(&*guard)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::ForwardMode;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::load(dir.path().join("nope.json"));
        let s = store.snapshot();
        assert!(s.forwarding_enabled);
        assert!(s.blacklist.is_empty());
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json {").unwrap();
        let store = SettingsStore::load(&path);
        assert!(store.snapshot().forwarding_enabled);
    }

    #[test]
    fn update_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = SettingsStore::load(&path);
        store
            .update(|s| {
                s.target_channel = "@target".to_string();
                s.forward_mode = ForwardMode::Copy;
                s.blacklist.push("spam".to_string());
            })
            .unwrap();

        // A fresh store sees the persisted document.
        let reloaded = SettingsStore::load(&path);
        let s = reloaded.snapshot();
        assert_eq!(s.target_channel, "@target");
        assert_eq!(s.forward_mode, ForwardMode::Copy);
        assert_eq!(s.blacklist, vec!["spam"]);
    }
}
