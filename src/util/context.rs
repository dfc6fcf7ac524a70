//! Global context for hubq operations.
//!
//! Provides centralized access to the working directory and the effective
//! configuration, and opens the manifest source that configuration selects.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::sources::{LocalSource, ManifestSource, RemoteSource};
use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Effective configuration (global merged with project)
    config: Config,

    /// Whether to use verbose output
    verbose: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext for the current directory.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        Ok(Self::with_cwd(cwd))
    }

    /// Create a GlobalContext with a specific working directory.
    ///
    /// Configuration is read from `~/.hubq/config.toml` and
    /// `<cwd>/.hubq/config.toml`.
    pub fn with_cwd(cwd: PathBuf) -> Self {
        let project_path = project_config_path(&cwd);
        let config = match global_config_path() {
            Some(global_path) => load_config(&global_path, &project_path),
            None => Config::load_or_default(&project_path),
        };

        GlobalContext {
            cwd,
            config,
            verbose: false,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the effective configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a mutable reference to the configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    /// Open the manifest source selected by the configuration.
    ///
    /// A local manifest directory wins over a Hub endpoint. Relative
    /// directories are resolved against the working directory.
    pub fn open_source(&self) -> Result<Box<dyn ManifestSource>> {
        if let Some(dir) = &self.config.local.manifests_dir {
            let dir = self.cwd.join(dir);
            tracing::debug!("Using local manifests from {}", dir.display());

            let source = LocalSource::from_directory(&dir, self.config.local.load_type_instances)
                .with_context(|| format!("failed to load manifests from {}", dir.display()))?;
            return Ok(Box::new(source));
        }

        if let Some(endpoint) = self.config.endpoint()? {
            tracing::debug!("Using Hub at {}", endpoint);

            let source = RemoteSource::connect(
                endpoint,
                self.config.timeout(),
                self.config.retry_policy(),
            )?;
            return Ok(Box::new(source));
        }

        bail!(
            "no Hub configured\n\
             help: pass --endpoint <URL> or --local <DIR>, or set `hub.endpoint` in {}",
            project_config_path(&self.cwd).display()
        )
    }

    /// Open the local source, if the configuration selects one.
    pub fn open_local_source(&self) -> Result<LocalSource> {
        let Some(dir) = &self.config.local.manifests_dir else {
            bail!("this command needs a local manifest directory\nhelp: pass --local <DIR>");
        };

        let dir = self.cwd.join(dir);
        LocalSource::from_directory(&dir, self.config.local.load_type_instances)
            .with_context(|| format!("failed to load manifests from {}", dir.display()))
    }
}
