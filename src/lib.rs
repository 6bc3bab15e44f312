//! Profile: people search host.
//!
//! Wraps the [`profile_search`] core with everything a running host needs:
//!
//! - **Configuration**: TOML file with `[search]`, `[logging]` and
//!   `[directory]` sections
//! - **Directory**: an in-memory user directory loaded from a JSON fixture,
//!   implementing every collaborator contract of the core
//! - **Service**: runs searches and records them in per-user history
//! - **Host bridge**: newline-delimited JSON commands over stdin/stdout

pub mod config;
pub mod directory;
pub mod error;
pub mod host;
pub mod logging;
pub mod service;

pub use config::ProfileConfig;
pub use directory::{DirectoryFixture, FixtureDirectory, FixtureUser};
pub use error::{ProfileError, Result};
pub use service::{FixtureSearchService, ProfileSearchService};
