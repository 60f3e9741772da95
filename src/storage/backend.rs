//! Key-value storage backend trait and implementations.
//!
//! This module provides the storage boundary for persisted client state:
//! - `FileStore` - One JSON file per slot in the data directory (default)
//! - `MemoryStore` - In-process map, used when nothing should touch disk

use crate::Result;
use std::collections::HashMap;

/// Trait for backends that hold named slots of serialized data.
///
/// A slot is read once at startup and replaced wholesale on every write.
pub trait KeyValueStore {
    /// Read the raw contents of a slot. `Ok(None)` if the slot was never written.
    fn get(&self, slot: &str) -> Result<Option<String>>;

    /// Replace the contents of a slot.
    fn set(&mut self, slot: &str, value: &str) -> Result<()>;

    /// Get the storage location description (for display purposes).
    fn location(&self) -> String;
}

/// Slot storage kept in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with one slot pre-populated.
    pub fn with_slot(slot: &str, value: impl Into<String>) -> Self {
        let mut store = Self::new();
        store.slots.insert(slot.to_string(), value.into());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.slots.get(slot).cloned())
    }

    fn set(&mut self, slot: &str, value: &str) -> Result<()> {
        self.slots.insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
