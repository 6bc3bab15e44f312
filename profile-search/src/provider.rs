//! Collaborator contracts the aggregator is built against.
//!
//! The profile store, the user directory, and profile enrichment live
//! outside this crate. Hosts implement these traits over their own storage;
//! every implementation must be `Send + Sync` so sources can be queried
//! concurrently.

use std::future::Future;

use crate::error::SearchError;
use crate::types::{Person, UserRecord};

/// Profile-store lookup returning bare user identifiers.
pub trait DirectoryIdentitySearch: Send + Sync {
    /// Identifiers of users whose name or email matches `text`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the backing store cannot be queried.
    fn find_identifiers_by_name_or_email(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<String>, SearchError>> + Send;

    /// Identifiers of users whose declared interests match `text`.
    ///
    /// When `include_extended_bio` is set the extended (business) biography
    /// is searched as well.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the backing store cannot be queried.
    fn find_identifiers_by_interest(
        &self,
        text: &str,
        include_extended_bio: bool,
    ) -> impl Future<Output = Result<Vec<String>, SearchError>> + Send;
}

/// The user directory: identifier resolution, direct searches, and the
/// visibility and result-count policies that apply to the current caller.
pub trait UserDirectory: Send + Sync {
    /// Resolve identifiers to user records, preserving input order where
    /// possible. Unknown identifiers are omitted.
    fn resolve(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<Vec<UserRecord>, SearchError>> + Send;

    /// Users in the local directory matching `text`.
    fn search_local(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<UserRecord>, SearchError>> + Send;

    /// Users known to external identity providers matching `text`.
    fn search_external(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<Vec<UserRecord>, SearchError>> + Send;

    /// Whether the current caller bypasses visibility filtering.
    fn is_privileged_caller(&self) -> impl Future<Output = Result<bool, SearchError>> + Send;

    /// Identifiers of users hidden from non-privileged callers.
    fn invisible_user_ids(&self) -> impl Future<Output = Result<Vec<String>, SearchError>> + Send;

    /// Maximum number of results a search may return. Values `<= 0` yield
    /// empty result sets.
    fn max_result_count(&self) -> i64;
}

/// Projects user records into the richer [`Person`] view.
pub trait ProfileEnrichment: Send + Sync {
    /// Map `records` to people, preserving order.
    fn project(
        &self,
        records: Vec<UserRecord>,
    ) -> impl Future<Output = Result<Vec<Person>, SearchError>> + Send;
}
