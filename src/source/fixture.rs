//! Offline source backed by a JSON file.
//!
//! The file holds the full catalog as `{"people": [ ... ]}` and is paginated
//! locally. Cursors are opaque to callers; internally they encode the offset
//! of the next character.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{CharacterSource, SourceError};
use crate::models::{Character, Page, PageRequest};

const CURSOR_PREFIX: &str = "offset:";

#[derive(Debug, Deserialize)]
struct FixtureFile {
    people: Vec<Character>,
}

/// Serves pages out of an in-memory copy of a fixture file.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    path: PathBuf,
    people: Vec<Character>,
}

impl FixtureSource {
    /// Load the fixture at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let raw = std::fs::read_to_string(&path).map_err(|e| SourceError::Fixture {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let file: FixtureFile = serde_json::from_str(&raw).map_err(|e| SourceError::Fixture {
            path: path.clone(),
            message: e.to_string(),
        })?;
        Ok(Self::from_characters(path, file.people))
    }

    pub fn from_characters(path: impl Into<PathBuf>, people: Vec<Character>) -> Self {
        Self {
            path: path.into(),
            people,
        }
    }

    fn offset_of(cursor: Option<&str>) -> Result<usize, SourceError> {
        match cursor {
            None => Ok(0),
            Some(cursor) => cursor
                .strip_prefix(CURSOR_PREFIX)
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| SourceError::Query(format!("invalid cursor: {}", cursor))),
        }
    }

    /// Build the page for `request` without any I/O.
    pub fn page_for(&self, request: &PageRequest) -> Result<Page, SourceError> {
        let start = Self::offset_of(request.after.as_deref())?.min(self.people.len());
        let end = start
            .saturating_add(request.first.get() as usize)
            .min(self.people.len());
        let has_next_page = end < self.people.len();
        let end_cursor = (end > start).then(|| format!("{}{}", CURSOR_PREFIX, end));

        Ok(
            Page::new(self.people[start..end].to_vec(), end_cursor, has_next_page)
                .with_total_count(self.people.len() as u32),
        )
    }
}

impl CharacterSource for FixtureSource {
    async fn fetch_page(&self, request: &PageRequest) -> Result<Option<Page>, SourceError> {
        self.page_for(request).map(Some)
    }

    fn describe(&self) -> String {
        format!("file://{}", self.path.display())
    }
}
