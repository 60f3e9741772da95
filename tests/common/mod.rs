//! Common test utilities for roster integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't pollute
//! the user's `~/.local/share/roster/` directory or read their config.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
pub use tempfile::TempDir;

/// The bundled seven-character catalog.
pub fn fixture_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("people.json")
}

/// A test environment with isolated data and config storage.
///
/// The `roster()` method returns a `Command` that points the data directory
/// and the config file into temp directories and reads pages from the
/// fixture catalog, making tests parallel-safe and offline.
pub struct TestEnv {
    pub data_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            data_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the roster binary reading from the fixture catalog.
    pub fn roster(&self) -> Command {
        let mut cmd = self.roster_without_endpoint();
        cmd.env("ROSTER_ENDPOINT", format!("file://{}", fixture_path().display()));
        cmd
    }

    /// Get a Command for the roster binary with no endpoint configured.
    pub fn roster_without_endpoint(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_roster"));
        cmd.env("ROSTER_DATA_DIR", self.data_dir.path());
        cmd.env("ROSTER_CONFIG", self.config_path());
        cmd.env_remove("ROSTER_ENDPOINT");
        cmd.env_remove("ROSTER_PAGE_SIZE");
        cmd.env_remove("ROSTER_LOG");
        cmd
    }

    /// Get the path to the data directory.
    pub fn data_path(&self) -> &Path {
        self.data_dir.path()
    }

    /// Path of the (possibly absent) config.kdl used by this environment.
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.path().join("config.kdl")
    }

    /// Write config.kdl for this environment.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.config_path(), contents).unwrap();
    }

    /// Path of the persisted favorites file.
    pub fn favorites_path(&self) -> PathBuf {
        self.data_dir.path().join("favorites.json")
    }

    /// Run a command and parse its stdout as JSON.
    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.roster().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "roster {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// IDs of the `characters` array of a `list` result, in order.
pub fn ids(result: &serde_json::Value) -> Vec<String> {
    result["characters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect()
}
