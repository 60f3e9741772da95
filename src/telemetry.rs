//! Logging initialisation.
//!
//! The CLI logs to stderr so stdout stays machine-readable. The TUI owns the
//! terminal, so it logs to a daily-rolling file in the data directory instead.

use std::path::{Path, PathBuf};

use tracing_subscriber::filter::{Directive, LevelFilter};
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Environment variable holding log filter directives (e.g. `roster=debug`).
pub const LOG_ENV: &str = "ROSTER_LOG";

const LOG_FILE_PREFIX: &str = "roster.log";

/// Where log lines are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Daily-rolling files under this directory
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Number of `-v` flags
    pub verbosity: u8,
    /// `log-level` from config.kdl
    pub configured_level: Option<String>,
    /// Emit JSON lines instead of the compact text format
    pub json: bool,
    pub target: LogTarget,
}

impl TelemetryConfig {
    pub fn stderr(verbosity: u8) -> Self {
        Self {
            verbosity,
            configured_level: None,
            json: false,
            target: LogTarget::Stderr,
        }
    }

    pub fn file(verbosity: u8, dir: impl Into<PathBuf>) -> Self {
        Self {
            verbosity,
            configured_level: None,
            json: false,
            target: LogTarget::File(dir.into()),
        }
    }

    pub fn with_configured_level(mut self, level: Option<&str>) -> Self {
        self.configured_level = level.map(str::to_string);
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Keeps the non-blocking file writer flushing until dropped.
pub struct TelemetryGuard {
    _guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
pub fn init(config: TelemetryConfig) -> TelemetryGuard {
    let filter = EnvFilter::builder()
        .with_default_directive(default_directive(
            config.verbosity,
            config.configured_level.as_deref(),
        ))
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let mut guard = None;
    let output: Box<dyn Layer<Registry> + Send + Sync> = match &config.target {
        LogTarget::Stderr => stderr_layer(config.json),
        LogTarget::File(dir) => match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let (layer, worker) = file_layer(dir, config.json);
                guard = Some(worker);
                layer
            }
            // Never fall back to stderr here: the terminal belongs to the TUI.
            Err(_) => Box::new(tracing_subscriber::fmt::layer().with_writer(std::io::sink)),
        },
    };

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(output);
    layers.push(Box::new(filter));
    let _ = Registry::default().with(layers).try_init();

    TelemetryGuard { _guard: guard }
}

fn stderr_layer(json: bool) -> Box<dyn Layer<Registry> + Send + Sync> {
    if json {
        Box::new(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(true),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
    }
}

fn file_layer(
    dir: &Path,
    json: bool,
) -> (
    Box<dyn Layer<Registry> + Send + Sync>,
    tracing_appender::non_blocking::WorkerGuard,
) {
    let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let layer: Box<dyn Layer<Registry> + Send + Sync> = if json {
        Box::new(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
    };
    (layer, guard)
}

/// `-v` wins over config.kdl; an unparseable configured level falls back to `warn`.
fn default_directive(verbosity: u8, configured: Option<&str>) -> Directive {
    if verbosity > 0 {
        return level_from_verbosity(verbosity).into();
    }
    configured
        .and_then(|level| level.parse::<Directive>().ok())
        .unwrap_or_else(|| LevelFilter::WARN.into())
}

fn level_from_verbosity(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_from_verbosity(0), LevelFilter::WARN);
        assert_eq!(level_from_verbosity(1), LevelFilter::INFO);
        assert_eq!(level_from_verbosity(2), LevelFilter::DEBUG);
        assert_eq!(level_from_verbosity(7), LevelFilter::TRACE);
    }

    #[test]
    fn test_default_directive_precedence() {
        assert_eq!(default_directive(0, None).to_string(), "warn");
        assert_eq!(default_directive(0, Some("debug")).to_string(), "debug");
        assert_eq!(default_directive(1, Some("debug")).to_string(), "info");
    }

    #[test]
    fn test_config_builders() {
        let config = TelemetryConfig::file(2, "/tmp/logs")
            .with_configured_level(Some("trace"))
            .with_json(true);
        assert_eq!(config.target, LogTarget::File(PathBuf::from("/tmp/logs")));
        assert_eq!(config.configured_level.as_deref(), Some("trace"));
        assert!(config.json);
        assert_eq!(TelemetryConfig::stderr(0).target, LogTarget::Stderr);
    }
}
