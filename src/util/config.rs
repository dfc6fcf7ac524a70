//! Configuration file support for hubq.
//!
//! hubq supports two configuration file locations:
//! - Global: `~/.hubq/config.toml` - User-wide defaults
//! - Project: `.hubq/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::sources::retry::{DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY};
use crate::sources::RetryPolicy;

/// Default timeout of one Hub request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// hubq configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote Hub settings
    pub hub: HubConfig,

    /// Local manifest directory settings
    pub local: LocalConfig,
}

/// Remote Hub settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// GraphQL endpoint URL
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    pub timeout: Option<u64>,

    /// Attempts per query (1 = no retry)
    pub retry_attempts: Option<u32>,

    /// Pause between attempts in milliseconds
    pub retry_delay_ms: Option<u64>,
}

/// Local manifest directory settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Directory to load manifests from instead of querying the Hub
    pub manifests_dir: Option<PathBuf>,

    /// Also load TypeInstance documents
    #[serde(default)]
    pub load_type_instances: bool,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Hub settings
        if other.hub.endpoint.is_some() {
            self.hub.endpoint = other.hub.endpoint;
        }
        if other.hub.timeout.is_some() {
            self.hub.timeout = other.hub.timeout;
        }
        if other.hub.retry_attempts.is_some() {
            self.hub.retry_attempts = other.hub.retry_attempts;
        }
        if other.hub.retry_delay_ms.is_some() {
            self.hub.retry_delay_ms = other.hub.retry_delay_ms;
        }

        // Local settings
        if other.local.manifests_dir.is_some() {
            self.local.manifests_dir = other.local.manifests_dir;
        }
        if other.local.load_type_instances {
            self.local.load_type_instances = true;
        }
    }

    /// Parse the configured Hub endpoint.
    pub fn endpoint(&self) -> Result<Option<Url>> {
        self.hub
            .endpoint
            .as_deref()
            .map(|s| Url::parse(s).with_context(|| format!("invalid Hub endpoint: {}", s)))
            .transpose()
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.hub.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Retry policy for Hub queries.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.hub.retry_attempts.unwrap_or(DEFAULT_RETRY_ATTEMPTS),
            self.hub
                .retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_RETRY_DELAY),
        )
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.hubq/config.toml)
/// 2. Global config (~/.hubq/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    // Load global config first
    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    // Project config overrides global
    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Get the global hubq config directory (~/.hubq).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".hubq"))
}

/// Get the global config path (~/.hubq/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.hubq/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".hubq").join("config.toml")
}
