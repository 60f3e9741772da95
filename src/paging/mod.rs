//! Cursor-based accumulation of fetched pages.
//!
//! Fetching and merging are two separate phases. The caller builds a
//! [`PageRequest`] with [`next_request`], awaits the remote source itself and
//! then hands the result to [`accumulate`], which never performs I/O.

use std::num::NonZeroU32;

use crate::models::{Character, Page, PageRequest};

/// Everything fetched so far plus the continuation state of the newest page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageWindow {
    /// `None` when the window was built from a malformed page
    entities: Option<Vec<Character>>,
    end_cursor: Option<String>,
    has_next_page: bool,
    total_count: Option<u32>,
}

impl Default for PageWindow {
    fn default() -> Self {
        Self::new()
    }
}

impl PageWindow {
    /// An empty window at session start.
    ///
    /// Nothing has been fetched yet, so the window reports more pages.
    pub fn new() -> Self {
        Self {
            entities: Some(Vec::new()),
            end_cursor: None,
            has_next_page: true,
            total_count: None,
        }
    }

    /// Accumulated characters in fetch order.
    pub fn entities(&self) -> &[Character] {
        self.entities.as_deref().unwrap_or(&[])
    }

    /// Whether the window holds a valid entity sequence.
    pub fn is_valid(&self) -> bool {
        self.entities.is_some()
    }

    pub fn len(&self) -> usize {
        self.entities().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities().is_empty()
    }

    pub fn end_cursor(&self) -> Option<&str> {
        self.end_cursor.as_deref()
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    /// Total number of characters the source reports, if known.
    pub fn total_count(&self) -> Option<u32> {
        self.total_count
    }

    pub fn find(&self, id: &str) -> Option<&Character> {
        self.entities().iter().find(|c| c.id == id)
    }
}

impl From<Page> for PageWindow {
    fn from(page: Page) -> Self {
        let page_info = page.page_info.clone();
        let total_count = page.total_count;
        Self {
            entities: page.into_characters(),
            end_cursor: page_info.end_cursor,
            has_next_page: page_info.has_next_page,
            total_count,
        }
    }
}

/// Merge a freshly fetched page into the accumulated window.
///
/// An absent page, a malformed page or an invalid previous window leave
/// `previous` unchanged. Otherwise the page's characters are appended in
/// order (no dedup, no reordering) and the page's cursor, has-next flag and
/// total count replace the previous ones.
pub fn accumulate(previous: PageWindow, page: Option<Page>) -> PageWindow {
    let Some(page) = page else {
        return previous;
    };
    if !previous.is_valid() || page.edges.is_none() {
        tracing::debug!("ignoring malformed page or window");
        return previous;
    }

    let page_info = page.page_info.clone();
    let total_count = page.total_count;
    let fetched = page.into_characters().unwrap_or_default();

    let mut entities = previous.entities.unwrap_or_default();
    let before = entities.len();
    entities.extend(fetched);
    tracing::debug!(
        before,
        after = entities.len(),
        has_next_page = page_info.has_next_page,
        "accumulated page"
    );

    PageWindow {
        entities: Some(entities),
        end_cursor: page_info.end_cursor,
        has_next_page: page_info.has_next_page,
        total_count,
    }
}

/// Request for the page following `window`.
pub fn next_request(window: &PageWindow, page_size: NonZeroU32) -> PageRequest {
    PageRequest {
        first: page_size,
        after: window.end_cursor.clone(),
    }
}
