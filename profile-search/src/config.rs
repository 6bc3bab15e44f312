//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls history size, source timeouts, fan-out
//! behaviour, the history cache substrate, and source circuit breaking.

use crate::error::SearchError;

/// Default number of distinct terms remembered per user.
pub const DEFAULT_MAX_SEARCH_HISTORY: usize = 5;

/// Configuration for people search and search history.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Maximum number of distinct terms kept in each user's history.
    pub max_search_history: usize,
    /// Per-source timeout in milliseconds. A source exceeding it is treated
    /// as having failed for that request.
    pub source_timeout_ms: u64,
    /// Whether name-or-email searches query their sources concurrently.
    /// Merge order is the same either way.
    pub concurrent_sources: bool,
    /// Maximum number of users whose history is cached at once.
    pub history_cache_capacity: u64,
    /// Seconds of inactivity after which a user's history is dropped.
    /// Set to 0 to keep history until evicted by capacity or cleared.
    pub history_idle_seconds: u64,
    /// Number of lock stripes serialising history writes per user.
    pub lock_stripes: usize,
    /// Consecutive failures before a source is temporarily skipped.
    pub breaker_failure_threshold: u32,
    /// Seconds a tripped source stays skipped before a probe is allowed.
    pub breaker_cooldown_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_search_history: DEFAULT_MAX_SEARCH_HISTORY,
            source_timeout_ms: 5_000,
            concurrent_sources: true,
            history_cache_capacity: 10_000,
            history_idle_seconds: 0,
            lock_stripes: 64,
            breaker_failure_threshold: 3,
            breaker_cooldown_secs: 60,
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `max_search_history` must be greater than 0
    /// - `source_timeout_ms` must be greater than 0
    /// - `history_cache_capacity` must be greater than 0
    /// - `lock_stripes` must be greater than 0
    /// - `breaker_failure_threshold` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_search_history == 0 {
            return Err(SearchError::Config(
                "max_search_history must be greater than 0".into(),
            ));
        }
        if self.source_timeout_ms == 0 {
            return Err(SearchError::Config(
                "source_timeout_ms must be greater than 0".into(),
            ));
        }
        if self.history_cache_capacity == 0 {
            return Err(SearchError::Config(
                "history_cache_capacity must be greater than 0".into(),
            ));
        }
        if self.lock_stripes == 0 {
            return Err(SearchError::Config(
                "lock_stripes must be greater than 0".into(),
            ));
        }
        if self.breaker_failure_threshold == 0 {
            return Err(SearchError::Config(
                "breaker_failure_threshold must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
