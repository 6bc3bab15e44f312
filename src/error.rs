//! Error types for the profile search host.

use profile_search::SearchError;

/// Top-level error type for the host layer.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// People search or search history failure.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Directory fixture could not be loaded.
    #[error("directory error: {0}")]
    Directory(String),

    /// Host protocol error (bad envelope, unknown command, bad payload).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ProfileError>;
