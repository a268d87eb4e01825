use anyhow::{Context, Result};
use dasmine_engine::{DuplicatePolicy, RunOptions};
use dasmine_providers::{DEFAULT_ADMIN_USER, DEFAULT_PROGRESS_INTERVAL, EventFilter, SourceOptions};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::args::Cli;

/// Environment variable naming a configuration file
pub const CONFIG_ENV: &str = "DASMINE_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub skip_admin_user: bool,
    pub admin_user: String,
    /// 0 disables progress reports
    pub progress_interval: u64,
    pub duplicate_policy: DuplicatePolicy,
    pub buffer: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip_admin_user: true,
            admin_user: DEFAULT_ADMIN_USER.to_string(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            duplicate_policy: DuplicatePolicy::default(),
            buffer: false,
        }
    }
}

/// Where the configuration comes from and whether it must exist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocation {
    pub path: PathBuf,
    pub required: bool,
}

/// Pick the configuration file by priority:
/// 1. Explicit `--config` path
/// 2. DASMINE_CONFIG environment variable
/// 3. `<config dir>/dasmine/config.toml`
///
/// The first two must exist; the default location is optional.
pub fn locate(
    explicit: Option<&Path>,
    env_value: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Option<ConfigLocation> {
    if let Some(path) = explicit {
        return Some(ConfigLocation {
            path: path.to_path_buf(),
            required: true,
        });
    }

    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return Some(ConfigLocation {
            path: PathBuf::from(value),
            required: true,
        });
    }

    config_dir.map(|dir| ConfigLocation {
        path: dir.join("dasmine").join("config.toml"),
        required: false,
    })
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load from the resolved location, or fall back to defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let location = locate(explicit, std::env::var_os(CONFIG_ENV), dirs::config_dir());

        match location {
            Some(location) if location.required || location.path.exists() => {
                if !location.path.exists() {
                    anyhow::bail!("Config file not found: {}", location.path.display());
                }
                tracing::debug!(path = %location.path.display(), "Loading config");
                Self::load_from(&location.path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Command-line flags take precedence over file values
    pub fn apply_cli(mut self, cli: &Cli) -> Self {
        if cli.include_admin {
            self.skip_admin_user = false;
        }
        if let Some(user) = &cli.admin_user {
            self.admin_user = user.clone();
        }
        if let Some(interval) = cli.progress_interval {
            self.progress_interval = interval;
        }
        if let Some(policy) = cli.duplicate_policy {
            self.duplicate_policy = policy.into();
        }
        if cli.buffer {
            self.buffer = true;
        }
        self
    }

    pub fn source_options(&self) -> SourceOptions {
        SourceOptions {
            filter: EventFilter {
                skip_admin_user: self.skip_admin_user,
                admin_user: self.admin_user.clone(),
            },
            progress_interval: self.progress_interval,
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            duplicate_policy: self.duplicate_policy,
        }
    }
}
