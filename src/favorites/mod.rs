//! Favorite characters, persisted across sessions.
//!
//! The favorite set stores full character snapshots, not just identities, so
//! favorites-only browsing works for characters that are not part of the
//! currently fetched pages. Membership is decided by identity alone.
//!
//! [`FavoritesStore`] wraps the set with a load-once, write-through contract
//! over a [`KeyValueStore`] slot.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::models::Character;
use crate::storage::KeyValueStore;

/// Slot name holding the serialized favorites list.
pub const FAVORITES_SLOT: &str = "favorites";

/// Deduplicated favorites in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoriteSet {
    entries: Vec<Character>,
}

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from snapshots, keeping the first snapshot of each identity.
    pub fn from_snapshots(snapshots: Vec<Character>) -> Self {
        let mut set = Self::new();
        for snapshot in snapshots {
            if !set.contains(&snapshot.id) {
                set.entries.push(snapshot);
            }
        }
        set
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|c| c.id == id)
    }

    pub fn find(&self, id: &str) -> Option<&Character> {
        self.entries.iter().find(|c| c.id == id)
    }

    pub fn as_slice(&self) -> &[Character] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Character> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a FavoriteSet {
    type Item = &'a Character;
    type IntoIter = std::slice::Iter<'a, Character>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Remove `character` from `set` if its identity is present, append it otherwise.
pub fn toggle(character: &Character, set: &FavoriteSet) -> FavoriteSet {
    let entries = if set.contains(&character.id) {
        set.entries
            .iter()
            .filter(|c| c.id != character.id)
            .cloned()
            .collect()
    } else {
        let mut entries = set.entries.clone();
        entries.push(character.clone());
        entries
    };
    FavoriteSet { entries }
}

/// Identity membership test.
pub fn is_favorite(character: &Character, set: &FavoriteSet) -> bool {
    set.contains(&character.id)
}

/// Favorite set bound to a persisted slot.
///
/// The slot is read once in [`FavoritesStore::load`] and rewritten after every
/// mutation.
#[derive(Debug)]
pub struct FavoritesStore<S: KeyValueStore> {
    store: S,
    favorites: FavoriteSet,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Load favorites from `store`.
    ///
    /// Never fails: a missing, unreadable or malformed slot yields an empty set.
    pub fn load(store: S) -> Self {
        let favorites = match store.get(FAVORITES_SLOT) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Character>>(&raw) {
                Ok(snapshots) => FavoriteSet::from_snapshots(snapshots),
                Err(e) => {
                    tracing::warn!(error = %e, "discarding malformed favorites");
                    FavoriteSet::new()
                }
            },
            Ok(None) => FavoriteSet::new(),
            Err(e) => {
                tracing::warn!(error = %e, location = %store.location(), "could not read favorites");
                FavoriteSet::new()
            }
        };
        tracing::debug!(count = favorites.len(), "favorites loaded");
        Self { store, favorites }
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    /// Toggle `character` and persist. Returns true if it is now a favorite.
    ///
    /// If persisting fails the in-memory set keeps the new state and the
    /// error is returned.
    pub fn toggle(&mut self, character: &Character) -> Result<bool> {
        self.favorites = toggle(character, &self.favorites);
        let now_favorite = self.favorites.contains(&character.id);
        tracing::info!(id = %character.id, favorite = now_favorite, "favorite toggled");
        self.persist()?;
        Ok(now_favorite)
    }

    /// Remove every favorite and persist.
    pub fn clear(&mut self) -> Result<()> {
        self.favorites = FavoriteSet::new();
        self.persist()
    }

    pub fn location(&self) -> String {
        self.store.location()
    }

    fn persist(&mut self) -> Result<()> {
        let raw = serde_json::to_string(&self.favorites)?;
        self.store.set(FAVORITES_SLOT, &raw)
    }

    /// Give back the underlying store.
    pub fn into_store(self) -> S {
        self.store
    }
}
