//! Configuration management for dex.
//!
//! Configuration is stored in TOML and every section is optional; missing
//! sections and fields fall back to defaults.
//!
//! ## Resolution Order
//!
//! 1. Explicit path (`--config` / `DEX_CONFIG`)
//! 2. Platform config directory: `<config dir>/config.toml`
//! 3. Built-in defaults when no file exists
//!
//! Environment variables `DEX_BASE_URL` and `DEX_DATA_DIR` override the loaded
//! values afterwards.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [api]
//! base_url = "https://pokeapi.co/api/v2"
//! timeout_secs = 30
//!
//! [prefetch]
//! window = 60
//! concurrency = 8
//!
//! [paths]
//! data_dir = "/home/user/.dex"
//! ```

use crate::fetcher::DEFAULT_BASE_URL;
use crate::prefetch::{DEFAULT_PREFETCH_CONCURRENCY, DEFAULT_PREFETCH_WINDOW};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the API root.
pub const ENV_BASE_URL: &str = "DEX_BASE_URL";
/// Environment variable overriding the cache directory.
pub const ENV_DATA_DIR: &str = "DEX_DATA_DIR";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote API settings
    pub api: ApiConfig,
    /// Type prefetch tuning
    pub prefetch: PrefetchConfig,
    /// Local storage locations
    pub paths: PathsConfig,
}

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API root; list pages live at `<base_url>/pokemon`.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// Type prefetch tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefetchConfig {
    /// Number of leading items (arrival order) whose types are prefetched.
    pub window: usize,
    /// Maximum detail requests in flight during a prefetch run.
    pub concurrency: usize,
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_PREFETCH_WINDOW,
            concurrency: DEFAULT_PREFETCH_CONCURRENCY,
        }
    }
}

/// Local storage locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory holding the favorites, type, and detail caches.
    ///
    /// Default locations:
    /// - Linux: `~/.local/share/dex`
    /// - macOS: `~/Library/Application Support/dev.dex.dex`
    /// - Windows: `%APPDATA%\dex\dex\data`
    pub data_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: directories::ProjectDirs::from("dev", "dex", "dex").map_or_else(
                || {
                    directories::BaseDirs::new().map_or_else(
                        || PathBuf::from(".dex"),
                        |base| base.home_dir().join(".dex"),
                    )
                },
                |dirs| dirs.data_dir().to_path_buf(),
            ),
        }
    }
}

impl Config {
    /// Load configuration from `path` when given, else from the default location.
    ///
    /// An explicit path must exist; the default location may be missing.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let default_path = Self::config_path()?;
                if default_path.exists() {
                    Self::load_from(&default_path)?
                } else {
                    debug!("No config at {}, using defaults", default_path.display());
                    Self::default()
                }
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Default configuration file path.
    ///
    /// - Linux: `~/.config/dex/config.toml`
    /// - macOS: `~/Library/Application Support/dev.dex.dex/config.toml`
    /// - Windows: `%APPDATA%\dex\dex\config\config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("dev", "dex", "dex")
            .ok_or_else(|| Error::Config("Failed to determine project directories".into()))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides from a variable lookup (the process environment in practice).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.api.base_url = url.trim().to_string();
        }
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.trim().is_empty()) {
            self.paths.data_dir = PathBuf::from(dir.trim());
        }
    }

    /// Reject values that would make the client unusable.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.api.base_url)
            .map_err(|e| Error::Config(format!("api.base_url '{}': {e}", self.api.base_url)))?;
        if self.api.timeout_secs == 0 {
            return Err(Error::Config("api.timeout_secs must be at least 1".into()));
        }
        if self.prefetch.concurrency == 0 {
            return Err(Error::Config(
                "prefetch.concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
