//! Diagnostic logging setup.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Build the env filter: `RUST_LOG` when set, otherwise the configured directive.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter))
}

/// Install a stderr `fmt` subscriber. Stdout stays free for the JSON protocol.
///
/// Does nothing if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(config))
        .try_init();
}
