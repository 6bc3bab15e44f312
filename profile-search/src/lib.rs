//! # profile-search
//!
//! People search and per-user search history for profile directories.
//!
//! ## Design
//!
//! - [`ResultAggregator`] merges identity-store, local-directory, and
//!   external-directory matches, keeps the first occurrence of each user,
//!   caps the list, hides invisible users from non-privileged callers, and
//!   enriches the rest into [`Person`] values
//! - Sources are queried concurrently under a per-source timeout and
//!   circuit breaker; a failing source degrades the request to partial
//!   results instead of failing it
//! - [`SearchHistoryStore`] keeps each user's last few distinct search terms
//!   in a bounded [`KeyedCache`], evicting the oldest term when full
//! - History writes are serialised per user; reads are lock-free snapshots
//!
//! ## Privacy
//!
//! - Query text is logged only at trace level
//! - Error messages never contain query text

pub mod aggregator;
pub mod cache;
pub mod circuit_breaker;
pub mod config;
pub mod error;
pub mod history;
pub mod provider;
pub mod types;

#[cfg(test)]
mod test_support;

pub use aggregator::ResultAggregator;
pub use cache::{KeyedCache, MokaKeyedCache};
pub use config::{SearchConfig, DEFAULT_MAX_SEARCH_HISTORY};
pub use error::{Result, SearchError};
pub use history::SearchHistoryStore;
pub use provider::{DirectoryIdentitySearch, ProfileEnrichment, UserDirectory};
pub use types::{
    History, Person, SearchKind, SearchResultSet, SearchSource, SearchTerm, TermMap, UserRecord,
};
