//! KDL schema for config.kdl.
//!
//! This module provides:
//! - `RosterConfig`, the Rust struct representing the KDL schema
//! - Serialization/deserialization to/from KDL format
//! - Validation and merging
//! - Reading and writing the config file

use std::fs;
use std::io;
use std::path::Path;

use kdl::{KdlDocument, KdlEntry, KdlNode, KdlValue};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output (default, machine-readable)
    #[default]
    Json,
    /// Human-readable output
    Human,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Line format of log output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Compact text lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(LogFormat::Text),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keys accepted by `roster config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "endpoint",
    "page-size",
    "data-dir",
    "output-format",
    "log-level",
    "log-format",
];

/// User preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// endpoint "https://swapi-graphql.netlify.app/.netlify/functions/index"
/// page-size 16
/// data-dir "/home/me/.local/share/roster"
/// output-format "human"  // or "json"
/// log-level "debug"
/// log-format "json"     // or "text"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterConfig {
    /// GraphQL endpoint, or `file://` path to a fixture
    pub endpoint: Option<String>,

    /// Characters requested per page (must be positive)
    pub page_size: Option<u32>,

    /// Directory holding persisted favorites
    pub data_dir: Option<String>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// Default log filter directive (e.g. "info", "roster=debug")
    pub log_level: Option<String>,

    /// Log line format
    pub log_format: Option<LogFormat>,
}

impl RosterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.page_size == Some(0) {
            return Err("page-size must be greater than 0".to_string());
        }
        if let Some(endpoint) = &self.endpoint {
            if endpoint.trim().is_empty() {
                return Err("endpoint must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document. Unknown nodes and mistyped values are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        config.endpoint = first_string(doc, "endpoint");
        config.data_dir = first_string(doc, "data-dir");
        config.log_level = first_string(doc, "log-level");
        config.output_format = first_string(doc, "output-format")
            .as_deref()
            .and_then(OutputFormat::parse);
        config.log_format = first_string(doc, "log-format")
            .as_deref()
            .and_then(LogFormat::parse);

        if let Some(node) = doc.get("page-size") {
            if let Some(entry) = node.entries().first() {
                if let Some(i) = entry.value().as_integer() {
                    if i >= 0 {
                        config.page_size = u32::try_from(i).ok();
                    }
                }
            }
        }

        config
    }

    /// Convert config to a KDL document.
    pub fn to_kdl(&self) -> KdlDocument {
        let mut doc = KdlDocument::new();

        if let Some(ref endpoint) = self.endpoint {
            push_string(&mut doc, "endpoint", endpoint);
        }

        if let Some(page_size) = self.page_size {
            let mut node = KdlNode::new("page-size");
            node.push(KdlEntry::new(KdlValue::Integer(page_size as i128)));
            doc.nodes_mut().push(node);
        }

        if let Some(ref data_dir) = self.data_dir {
            push_string(&mut doc, "data-dir", data_dir);
        }

        if let Some(ref format) = self.output_format {
            push_string(&mut doc, "output-format", format.as_str());
        }

        if let Some(ref level) = self.log_level {
            push_string(&mut doc, "log-level", level);
        }

        if let Some(format) = self.log_format {
            push_string(&mut doc, "log-format", format.as_str());
        }

        doc
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &RosterConfig) {
        if other.endpoint.is_some() {
            self.endpoint = other.endpoint.clone();
        }
        if other.page_size.is_some() {
            self.page_size = other.page_size;
        }
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir.clone();
        }
        if other.output_format.is_some() {
            self.output_format = other.output_format.clone();
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level.clone();
        }
        if other.log_format.is_some() {
            self.log_format = other.log_format;
        }
    }

    /// Config holding only `key = value`, parsed the way config.kdl is.
    ///
    /// Rejects unknown keys and values that would not survive a round trip
    /// through the file.
    pub fn from_key_value(key: &str, value: &str) -> Result<Self> {
        let invalid = |what: &str| Error::InvalidInput(format!("{} for {}: {:?}", what, key, value));
        let mut config = Self::new();
        match key {
            "endpoint" => config.endpoint = Some(value.to_string()),
            "page-size" => {
                let page_size = value
                    .trim()
                    .parse::<u32>()
                    .map_err(|_| invalid("expected a positive integer"))?;
                config.page_size = Some(page_size);
            }
            "data-dir" => config.data_dir = Some(value.to_string()),
            "output-format" => {
                config.output_format =
                    Some(OutputFormat::parse(value).ok_or_else(|| invalid("expected json or human"))?);
            }
            "log-level" => config.log_level = Some(value.to_string()),
            "log-format" => {
                config.log_format =
                    Some(LogFormat::parse(value).ok_or_else(|| invalid("expected text or json"))?);
            }
            _ => {
                return Err(Error::InvalidInput(format!(
                    "Unknown config key: {} (expected one of: {})",
                    key,
                    CONFIG_KEYS.join(", ")
                )));
            }
        }
        config.validate().map_err(Error::InvalidInput)?;
        Ok(config)
    }

    /// Read config.kdl. A missing file yields an empty config.
    pub fn read(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };
        let doc: KdlDocument = contents.parse()?;
        let config = Self::from_kdl(&doc);
        config
            .validate()
            .map_err(|msg| Error::Config(format!("{}: {}", path.display(), msg)))?;
        Ok(config)
    }

    /// Write config.kdl, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_kdl().to_string())?;
        Ok(())
    }
}

fn first_string(doc: &KdlDocument, name: &str) -> Option<String> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .and_then(|entry| entry.value().as_string())
        .map(str::to_string)
}

fn push_string(doc: &mut KdlDocument, name: &str, value: &str) {
    let mut node = KdlNode::new(name);
    node.push(KdlEntry::new(KdlValue::String(value.to_string())));
    doc.nodes_mut().push(node);
}
