//! Unified precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Environment variables (`ROSTER_ENDPOINT`, `ROSTER_PAGE_SIZE`, `ROSTER_DATA_DIR`)
//! 3. config.kdl (`~/.config/roster/config.kdl`, or `ROSTER_CONFIG`)
//! 4. Built-in defaults

use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::config::{LogFormat, OutputFormat, RosterConfig};
use crate::overview::DEFAULT_PAGE_SIZE;
use crate::source::DEFAULT_ENDPOINT;
use crate::storage::{DATA_DIR_ENV, default_data_dir};
use crate::{Error, Result};

/// Environment variable naming an alternate config.kdl.
pub const CONFIG_PATH_ENV: &str = "ROSTER_CONFIG";

/// Environment variable overriding the endpoint.
pub const ENDPOINT_ENV: &str = "ROSTER_ENDPOINT";

/// Environment variable overriding the page size.
pub const PAGE_SIZE_ENV: &str = "ROSTER_PAGE_SIZE";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.kdl
    ConfigFile,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile => write!(f, "config"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

impl Serialize for ValueSource {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, Serialize)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// The config.kdl that was consulted (it may not exist)
    pub config_path: PathBuf,
    pub endpoint: Resolved<String>,
    pub page_size: Resolved<NonZeroU32>,
    pub data_dir: Resolved<PathBuf>,
    pub output_format: Resolved<OutputFormat>,
    /// Log filter directive; absent unless configured
    pub log_level: Option<Resolved<String>>,
    pub log_format: Resolved<LogFormat>,
}

impl ResolvedConfig {
    pub fn endpoint(&self) -> &str {
        &self.endpoint.value
    }

    pub fn page_size(&self) -> NonZeroU32 {
        self.page_size.value
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir.value
    }

    pub fn output_format(&self) -> &OutputFormat {
        &self.output_format.value
    }

    pub fn log_level(&self) -> Option<&str> {
        self.log_level.as_ref().map(|r| r.value.as_str())
    }

    pub fn log_json(&self) -> bool {
        self.log_format.value == LogFormat::Json
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub endpoint: Option<String>,
    pub page_size: Option<NonZeroU32>,
    pub output_format: Option<OutputFormat>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_page_size(mut self, page_size: NonZeroU32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Path of config.kdl: `ROSTER_CONFIG` if set, else the platform config dir.
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    let config_dir = dirs::config_dir()
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("roster").join("config.kdl"))
}

/// Resolve configuration from the process environment and config.kdl.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let path = config_path()?;
    let file = RosterConfig::read(&path)?;
    resolve_with(&path, &file, overrides, |name| std::env::var(name).ok())
}

/// Resolve configuration against an explicit file config and environment lookup.
pub fn resolve_with<F>(
    config_path: &Path,
    file: &RosterConfig,
    overrides: &ConfigOverrides,
    env: F,
) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |name: &str| env(name).filter(|value| !value.is_empty());

    let endpoint = if let Some(ref endpoint) = overrides.endpoint {
        Resolved::new(endpoint.clone(), ValueSource::CliFlag)
    } else if let Some(endpoint) = env(ENDPOINT_ENV) {
        Resolved::new(endpoint, ValueSource::EnvVar(ENDPOINT_ENV.to_string()))
    } else if let Some(ref endpoint) = file.endpoint {
        Resolved::new(endpoint.clone(), ValueSource::ConfigFile)
    } else {
        Resolved::new(DEFAULT_ENDPOINT.to_string(), ValueSource::Default)
    };

    let page_size = if let Some(page_size) = overrides.page_size {
        Resolved::new(page_size, ValueSource::CliFlag)
    } else if let Some(raw) = env(PAGE_SIZE_ENV) {
        let page_size = raw.trim().parse::<NonZeroU32>().map_err(|_| {
            Error::Config(format!(
                "{} must be a positive integer, got {:?}",
                PAGE_SIZE_ENV, raw
            ))
        })?;
        Resolved::new(page_size, ValueSource::EnvVar(PAGE_SIZE_ENV.to_string()))
    } else if let Some(page_size) = file.page_size.and_then(NonZeroU32::new) {
        Resolved::new(page_size, ValueSource::ConfigFile)
    } else {
        Resolved::new(default_page_size(), ValueSource::Default)
    };

    let data_dir = if let Some(dir) = env(DATA_DIR_ENV) {
        Resolved::new(PathBuf::from(dir), ValueSource::EnvVar(DATA_DIR_ENV.to_string()))
    } else if let Some(ref dir) = file.data_dir {
        Resolved::new(PathBuf::from(dir), ValueSource::ConfigFile)
    } else {
        Resolved::new(default_data_dir()?, ValueSource::Default)
    };

    let output_format = if let Some(ref format) = overrides.output_format {
        Resolved::new(format.clone(), ValueSource::CliFlag)
    } else if let Some(ref format) = file.output_format {
        Resolved::new(format.clone(), ValueSource::ConfigFile)
    } else {
        Resolved::new(OutputFormat::Json, ValueSource::Default)
    };

    let log_level = file
        .log_level
        .as_ref()
        .map(|level| Resolved::new(level.clone(), ValueSource::ConfigFile));

    let log_format = match file.log_format {
        Some(format) => Resolved::new(format, ValueSource::ConfigFile),
        None => Resolved::new(LogFormat::Text, ValueSource::Default),
    };

    Ok(ResolvedConfig {
        config_path: config_path.to_path_buf(),
        endpoint,
        page_size,
        data_dir,
        output_format,
        log_level,
        log_format,
    })
}

fn default_page_size() -> NonZeroU32 {
    NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN)
}
