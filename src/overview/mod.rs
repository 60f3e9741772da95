//! The character overview: working set selection, filtering and paging.
//!
//! [`Overview`] composes the filter engine, the page window and the favorites
//! store. The working set is the favorite set in favorites-only mode and the
//! accumulated page window otherwise. Filter options are always derived from
//! the whole working set, independent of the active selection, so narrowing
//! one facet never hides the values needed to broaden another.

use std::num::NonZeroU32;

use serde::Serialize;

use crate::favorites::{FavoriteSet, FavoritesStore};
use crate::filter::{FilterEngine, Selection};
use crate::models::{Character, Page, PageRequest};
use crate::paging::{PageWindow, accumulate, next_request};
use crate::source::{CharacterSource, SourceError};
use crate::storage::KeyValueStore;
use crate::{Error, Result};

/// Default number of characters requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 16;

/// Fetch status of the page window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "snake_case")]
pub enum LoadState {
    /// No request in flight
    Idle,
    /// A request was issued and its result has not been applied yet
    Loading,
    /// The last request failed; the window is unchanged
    Failed(String),
}

/// One facet as the presentation layer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterControl {
    pub key: String,
    pub label: String,
    pub options: Vec<String>,
    pub values: Vec<String>,
}

/// State of one browsing session.
pub struct Overview<S: KeyValueStore> {
    engine: FilterEngine,
    selection: Selection,
    window: PageWindow,
    favorites: FavoritesStore<S>,
    favorites_only: bool,
    load_state: LoadState,
    page_size: NonZeroU32,
    inspected: Option<Character>,
}

impl<S: KeyValueStore> Overview<S> {
    pub fn new(engine: FilterEngine, favorites: FavoritesStore<S>, page_size: NonZeroU32) -> Self {
        let selection = Selection::for_engine(&engine);
        Self {
            engine,
            selection,
            window: PageWindow::new(),
            favorites,
            favorites_only: false,
            load_state: LoadState::Idle,
            page_size,
            inspected: None,
        }
    }

    /// Overview with the default facets.
    pub fn with_default_facets(favorites: FavoritesStore<S>, page_size: NonZeroU32) -> Self {
        Self::new(FilterEngine::default(), favorites, page_size)
    }

    pub fn engine(&self) -> &FilterEngine {
        &self.engine
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn favorites(&self) -> &FavoriteSet {
        self.favorites.favorites()
    }

    pub fn favorites_location(&self) -> String {
        self.favorites.location()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size
    }

    /// Characters subject to filtering.
    pub fn working_set(&self) -> &[Character] {
        if self.favorites_only {
            self.favorites.favorites().as_slice()
        } else {
            self.window.entities()
        }
    }

    /// The working set narrowed by the current selection, in working-set order.
    pub fn filtered(&self) -> Vec<&Character> {
        self.engine.apply(&self.selection, self.working_set())
    }

    /// Options for one facet over the unfiltered working set.
    pub fn options(&self, key: &str) -> Result<Vec<String>> {
        self.engine.options_for(key, self.working_set())
    }

    /// Every facet with its options and current values, in configuration order.
    pub fn filter_controls(&self) -> Vec<FilterControl> {
        self.engine
            .facets()
            .iter()
            .map(|facet| FilterControl {
                key: facet.key.to_string(),
                label: facet.label.to_string(),
                options: self
                    .engine
                    .options_for(facet.key, self.working_set())
                    .unwrap_or_default(),
                values: self.selection.values_for(facet.key),
            })
            .collect()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Replace the selected values of one facet.
    pub fn select<I, T>(&mut self, key: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.selection.set(key, values)?;
        tracing::debug!(facet = key, "selection changed");
        Ok(())
    }

    /// Add or remove one value of a facet. Returns true if now selected.
    pub fn toggle_option(&mut self, key: &str, value: &str) -> Result<bool> {
        self.selection.toggle(key, value)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    /// Switch the working set. Facet selections are kept.
    pub fn set_favorites_only(&mut self, favorites_only: bool) {
        self.favorites_only = favorites_only;
    }

    pub fn toggle_favorites_only(&mut self) -> bool {
        self.favorites_only = !self.favorites_only;
        self.favorites_only
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.is_favorite(id)
    }

    /// Toggle a character's favorite status. Returns true if now a favorite.
    pub fn toggle_favorite(&mut self, character: &Character) -> Result<bool> {
        self.favorites.toggle(character)
    }

    /// Toggle by identity, looking the character up in the window, then in favorites.
    pub fn toggle_favorite_by_id(&mut self, id: &str) -> Result<bool> {
        let character = self
            .find(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        self.toggle_favorite(&character)
    }

    /// Remove every favorite.
    pub fn clear_favorites(&mut self) -> Result<()> {
        self.favorites.clear()
    }

    /// Look a character up in the window, then in favorites.
    pub fn find(&self, id: &str) -> Option<&Character> {
        self.window
            .find(id)
            .or_else(|| self.favorites.favorites().find(id))
    }

    /// Open the detail view for one character.
    pub fn inspect(&mut self, id: &str) -> Result<&Character> {
        let character = self
            .find(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))?;
        let inspected: &Character = self.inspected.insert(character);
        Ok(inspected)
    }

    pub fn inspected(&self) -> Option<&Character> {
        self.inspected.as_ref()
    }

    pub fn close_inspect(&mut self) {
        self.inspected = None;
    }

    /// Whether "load more" would issue a request.
    ///
    /// A non-empty window without an end cursor cannot be continued: the
    /// request would restart at the first page.
    pub fn can_load_more(&self) -> bool {
        !self.favorites_only
            && self.window.has_next_page()
            && (self.window.is_empty() || self.window.end_cursor().is_some())
            && self.load_state != LoadState::Loading
    }

    /// First phase of loading: mark the window as loading and build the request.
    ///
    /// Returns `None` (and changes nothing) in favorites-only mode, when the
    /// source reported no further pages, or while a request is in flight.
    pub fn begin_load_more(&mut self) -> Option<PageRequest> {
        if !self.can_load_more() {
            return None;
        }
        self.load_state = LoadState::Loading;
        Some(next_request(&self.window, self.page_size))
    }

    /// Second phase of loading: apply the outcome of the request.
    ///
    /// A failure is recorded in [`LoadState::Failed`] and leaves the window
    /// untouched; it is not retried.
    pub fn complete_load(&mut self, outcome: std::result::Result<Option<Page>, SourceError>) {
        match outcome {
            Ok(page) => {
                let window = std::mem::take(&mut self.window);
                self.window = accumulate(window, page);
                self.load_state = LoadState::Idle;
            }
            Err(e) => {
                tracing::warn!(error = %e, "page fetch failed");
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Fetch and apply the next page. Returns false if nothing was requested.
    pub async fn load_more<C: CharacterSource>(&mut self, source: &C) -> bool {
        let Some(request) = self.begin_load_more() else {
            return false;
        };
        let outcome = source.fetch_page(&request).await;
        self.complete_load(outcome);
        true
    }

    /// Load up to `pages` further pages, stopping early on failure or exhaustion.
    ///
    /// Also stops when a fetch does not move the end cursor forward (an empty
    /// or malformed page, or a repeated cursor).
    /// Returns the first fetch error, if any.
    pub async fn load_pages<C: CharacterSource>(
        &mut self,
        source: &C,
        pages: Option<u32>,
    ) -> Result<()> {
        let mut loaded = 0;
        while pages.is_none_or(|limit| loaded < limit) {
            let before = self.window.end_cursor().map(str::to_owned);
            if !self.load_more(source).await {
                break;
            }
            if let LoadState::Failed(message) = &self.load_state {
                return Err(Error::Fetch(message.clone()));
            }
            loaded += 1;
            if self.window.end_cursor() == before.as_deref() {
                tracing::warn!(loaded, "fetch did not advance the window, stopping");
                break;
            }
        }
        tracing::info!(
            loaded,
            total = self.window.len(),
            has_next_page = self.window.has_next_page(),
            "pages loaded"
        );
        Ok(())
    }
}
