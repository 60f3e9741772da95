//! Terminal User Interface module for Roster
//!
//! This module provides a keyboard-driven browser over the character
//! catalog: a filterable table, a facet panel, a detail popup and
//! favorites management. Pages are fetched in the background.

mod app;
mod views;

pub use app::{Focus, TuiApp, run_tui};
pub use views::{CharacterTableView, FilterPanelView};
