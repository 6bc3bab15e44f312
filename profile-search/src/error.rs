//! Error types for the profile-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. Search query text never appears in error
//! messages.

use crate::types::SearchSource;

/// Errors that can occur during people search or history operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// A caller-supplied argument violated a precondition. No state was changed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A single search source failed to produce results.
    #[error("{origin} source failed: {message}")]
    Source {
        /// Which source failed.
        origin: SearchSource,
        /// Human-readable failure description.
        message: String,
    },

    /// A collaborator call did not complete within the configured timeout.
    #[error("timed out: {0}")]
    Timeout(String),

    /// Every source attempted for a request failed.
    #[error("all search sources failed: {0}")]
    AllSourcesFailed(String),

    /// The user directory failed (identifier resolution, visibility lookup,
    /// privilege check).
    #[error("directory error: {0}")]
    Directory(String),

    /// Profile enrichment failed.
    #[error("enrichment error: {0}")]
    Enrichment(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

/// Convenience type alias for profile-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
