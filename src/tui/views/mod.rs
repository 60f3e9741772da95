//! TUI Views module
//!
//! Contains the widgets composed by the browser screen.

pub mod character_detail;
mod character_table;
mod filter_panel;

pub use character_table::CharacterTableView;
pub use filter_panel::FilterPanelView;
