//! Headless people search host speaking newline-delimited JSON on stdio.
//!
//! Usage: `profile-host [CONFIG_PATH]`. Without a path the default config
//! location is used; a missing file means defaults.

use std::path::PathBuf;

use profile::{FixtureSearchService, ProfileConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(ProfileConfig::default_config_path);

    let config = ProfileConfig::load_or_default(&config_path)
        .map_err(|e| anyhow::anyhow!("failed to load {}: {e}", config_path.display()))?;
    profile::logging::init(&config.logging);

    tracing::info!(config = %config_path.display(), "profile-host starting");

    let service = FixtureSearchService::from_config(&config)?;

    profile::host::stdio::run_stdio_bridge(&service)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "profile-host exited with error");
            anyhow::anyhow!("profile-host failed: {e}")
        })?;

    tracing::info!("profile-host shut down cleanly");
    Ok(())
}
