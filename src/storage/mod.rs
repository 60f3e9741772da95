//! Storage layer for persisted client state.
//!
//! Roster persists exactly one thing between sessions: the favorites list.
//! It lives in a named slot of a [`KeyValueStore`]. The default backend is a
//! [`FileStore`] rooted at the data directory:
//!
//! - `ROSTER_DATA_DIR` environment variable, if set
//! - `data-dir` from config.kdl, if set
//! - `~/.local/share/roster/` (platform data dir) otherwise
//!
//! The precedence itself is applied by [`crate::config::resolver`].

pub mod backend;

pub use backend::{KeyValueStore, MemoryStore};

use crate::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ROSTER_DATA_DIR";

/// Slot storage backed by one JSON file per slot.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `slot`.
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.root.join(format!("{}.json", slot))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.slot_path(slot)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a temp file in the same directory and renames it over the
    /// slot, so a crash never leaves a half-written file behind.
    fn set(&mut self, slot: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.slot_path(slot))
            .map_err(|e| Error::Io(e.error))?;

        tracing::debug!(slot, path = %self.slot_path(slot).display(), "slot written");
        Ok(())
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

/// Platform data directory for Roster (`~/.local/share/roster` on Linux).
pub fn default_data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
        .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))?;
    Ok(data_dir.join("roster"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_missing_slot_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        assert_eq!(store.get("favorites").unwrap(), None);
    }

    #[test]
    fn test_file_store_roundtrip_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("nested").join("roster");
        let mut store = FileStore::new(&root);

        store.set("favorites", r#"[{"id":"1"}]"#).unwrap();

        assert!(root.join("favorites.json").exists());
        assert_eq!(
            store.get("favorites").unwrap().as_deref(),
            Some(r#"[{"id":"1"}]"#)
        );
    }

    #[test]
    fn test_file_store_overwrites_slot() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());

        store.set("favorites", "first").unwrap();
        store.set("favorites", "second").unwrap();

        assert_eq!(store.get("favorites").unwrap().as_deref(), Some("second"));
        // Only the slot file remains, no stray temp files
        let entries = fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_file_store_location() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        assert_eq!(store.location(), temp_dir.path().display().to_string());
    }

    #[test]
    fn test_default_data_dir_is_namespaced() {
        let dir = default_data_dir().unwrap();
        assert_eq!(dir.file_name().and_then(|n| n.to_str()), Some("roster"));
    }
}
