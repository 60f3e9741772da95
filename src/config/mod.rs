//! Configuration for Roster.
//!
//! ## config.kdl - User preferences
//!
//! Located at `~/.config/roster/config.kdl`, or wherever `ROSTER_CONFIG` points.
//!
//! Contains:
//! - `endpoint` - GraphQL endpoint URL, or `file://` path to a fixture
//! - `page-size` - Characters requested per page (positive)
//! - `data-dir` - Where favorites are persisted
//! - `output-format` - "json" or "human"
//! - `log-level` - Default log filter directive
//!
//! ## Precedence
//!
//! CLI flag > environment variable > config.kdl > defaults
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    CONFIG_PATH_ENV, ConfigOverrides, ENDPOINT_ENV, PAGE_SIZE_ENV, Resolved, ResolvedConfig,
    ValueSource, config_path, resolve_config, resolve_with,
};
pub use schema::{CONFIG_KEYS, LogFormat, OutputFormat, RosterConfig};
