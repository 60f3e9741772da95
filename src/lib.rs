//! Roster - browse, filter and favorite characters from a paginated catalog.
//!
//! This library provides the core functionality for the `roster` CLI and TUI:
//! cursor-based page accumulation, facet filtering over the fetched window,
//! and persisted favorites.

pub mod cli;
pub mod commands;
pub mod config;
pub mod favorites;
pub mod filter;
pub mod models;
pub mod overview;
pub mod paging;
pub mod source;
pub mod storage;
pub mod telemetry;
#[cfg(feature = "tui")]
pub mod tui;

pub use source::SourceError;

/// Library-level error type for Roster operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    Kdl(#[from] kdl::KdlError),

    #[error(transparent)]
    Source(#[from] SourceError),

    /// The last page fetch failed; the window was left unchanged
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// A facet key that is not part of the configured facet list
    #[error("Unknown filter facet: {0}")]
    UnknownFacet(String),

    #[error("Character not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for Roster operations.
pub type Result<T> = std::result::Result<T, Error>;
