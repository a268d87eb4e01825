//! TestWorld pattern for CLI integration tests.
//!
//! Provides:
//! - An isolated temp directory per test
//! - Helpers to write activity logs and config files into it
//! - Command configuration with a clean environment

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::fixtures::SampleFiles;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use dasmine_testing::{DasEvent, TestWorld, das_line};
///
/// let world = TestWorld::new()
///     .with_log("audit.jsonl", &[das_line(&[DasEvent::connect("1", "20240101090000")])]);
/// let input = world.path("audit.jsonl");
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    env_vars: HashMap<String, String>,
    samples: SampleFiles,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            env_vars: HashMap::new(),
            samples: SampleFiles::new(),
        }
    }

    /// Get the temp directory root.
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of a file inside the temp directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Write `lines` as a newline-terminated log file.
    pub fn with_log(self, name: &str, lines: &[String]) -> Self {
        self.write_log(name, lines).expect("Failed to write log");
        self
    }

    pub fn write_log(&self, name: &str, lines: &[String]) -> Result<PathBuf> {
        let path = self.path(name);
        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Write a raw file (e.g. a TOML config).
    pub fn with_file(self, name: &str, content: &str) -> Self {
        std::fs::write(self.path(name), content).expect("Failed to write file");
        self
    }

    /// Copy a bundled sample log into the temp directory.
    pub fn with_sample(self, sample_name: &str, dest_name: &str) -> Self {
        self.samples
            .copy_to(sample_name, &self.path(dest_name))
            .expect("Failed to copy sample");
        self
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Configure a CLI command with this test environment's settings.
    ///
    /// Runs in the temp directory, points the config lookup at a path that
    /// does not exist unless overridden, and applies extra env vars.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("RUST_LOG");
        cmd.env("XDG_CONFIG_HOME", self.path(".config"));
        cmd.env("HOME", self.temp_dir.path());
        cmd.env_remove("DASMINE_CONFIG");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Create a CLI command for the given binary path, configured for this world.
    pub fn command_from_path(&self, bin_path: impl AsRef<std::ffi::OsStr>) -> Command {
        let mut cmd = Command::new(bin_path);
        self.configure_command(&mut cmd);
        cmd
    }
}
