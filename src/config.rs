//! Host configuration, stored as TOML.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use profile_search::SearchConfig;

/// Top-level configuration for the profile search host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Search and history behaviour.
    pub search: SearchSettings,
    /// Diagnostic logging.
    pub logging: LoggingConfig,
    /// Where directory data comes from.
    pub directory: DirectoryConfig,
}

/// Serializable mirror of [`SearchConfig`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Distinct terms remembered per user.
    pub max_search_history: usize,
    /// Per-source timeout in milliseconds.
    pub source_timeout_ms: u64,
    /// Query sources concurrently.
    pub concurrent_sources: bool,
    /// Users whose history is cached at once.
    pub history_cache_capacity: u64,
    /// Idle seconds before a user's history is dropped (0 = never).
    pub history_idle_seconds: u64,
    /// Lock stripes serialising history writes.
    pub lock_stripes: usize,
    /// Consecutive failures before a source is skipped.
    pub breaker_failure_threshold: u32,
    /// Seconds a skipped source waits before being probed.
    pub breaker_cooldown_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchSettings {
    fn from(config: &SearchConfig) -> Self {
        Self {
            max_search_history: config.max_search_history,
            source_timeout_ms: config.source_timeout_ms,
            concurrent_sources: config.concurrent_sources,
            history_cache_capacity: config.history_cache_capacity,
            history_idle_seconds: config.history_idle_seconds,
            lock_stripes: config.lock_stripes,
            breaker_failure_threshold: config.breaker_failure_threshold,
            breaker_cooldown_secs: config.breaker_cooldown_secs,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` env-filter directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
        }
    }
}

/// Directory data source configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// JSON directory fixture. When unset the directory starts empty.
    pub fixture_path: Option<PathBuf>,
}

impl ProfileConfig {
    /// Core search configuration derived from the `[search]` section.
    pub fn search_config(&self) -> SearchConfig {
        let s = &self.search;
        SearchConfig {
            max_search_history: s.max_search_history,
            source_timeout_ms: s.source_timeout_ms,
            concurrent_sources: s.concurrent_sources,
            history_cache_capacity: s.history_cache_capacity,
            history_idle_seconds: s.history_idle_seconds,
            lock_stripes: s.lock_stripes,
            breaker_failure_threshold: s.breaker_failure_threshold,
            breaker_cooldown_secs: s.breaker_cooldown_secs,
        }
    }

    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// resulting search configuration is invalid.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| crate::error::ProfileError::Config(e.to_string()))?;
        config.search_config().validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Same as [`ProfileConfig::from_file`] when the file exists.
    pub fn load_or_default(path: &std::path::Path) -> crate::error::Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::info!(path = %path.display(), "no config file; using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::ProfileError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/profile/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("profile").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("profile")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/profile-config/config.toml")
        }
    }
}
