//! In-memory user directory loaded from a JSON fixture.
//!
//! [`FixtureDirectory`] implements every collaborator contract the search
//! core needs: identity-store lookups, the local and external directories,
//! the visibility policy, and profile enrichment. Matching is a
//! case-insensitive substring test.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use profile_search::{
    DirectoryIdentitySearch, Person, ProfileEnrichment, SearchError, UserDirectory, UserRecord,
};

use crate::error::{ProfileError, Result};

fn default_max_results() -> i64 {
    50
}

fn default_true() -> bool {
    true
}

/// One user in the fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureUser {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub extended_bio: Option<String>,
    /// Account comes from an external identity provider.
    #[serde(default)]
    pub external: bool,
    /// User has a profile in the identity store.
    #[serde(default = "default_true")]
    pub has_profile: bool,
}

impl FixtureUser {
    fn record(&self) -> UserRecord {
        UserRecord {
            id: self.id.clone(),
            display_name: self.display_name.clone(),
            email: self.email.clone(),
        }
    }

    fn matches_name_or_email(&self, needle: &str) -> bool {
        contains(&self.display_name, needle)
            || self.email.as_deref().is_some_and(|e| contains(e, needle))
    }

    fn matches_interest(&self, needle: &str, include_extended_bio: bool) -> bool {
        self.interests.iter().any(|i| contains(i, needle))
            || (include_extended_bio
                && self.extended_bio.as_deref().is_some_and(|b| contains(b, needle)))
    }
}

/// Serialized directory contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryFixture {
    #[serde(default)]
    pub users: Vec<FixtureUser>,
    /// Ids hidden from non-privileged callers.
    #[serde(default)]
    pub invisible: Vec<String>,
    /// Whether the caller this directory serves bypasses visibility.
    #[serde(default)]
    pub privileged: bool,
    #[serde(default = "default_max_results")]
    pub max_results: i64,
}

impl Default for DirectoryFixture {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            invisible: Vec::new(),
            privileged: false,
            max_results: default_max_results(),
        }
    }
}

struct Inner {
    fixture: DirectoryFixture,
    by_id: HashMap<String, usize>,
}

/// Cheaply cloneable directory over a [`DirectoryFixture`].
#[derive(Clone)]
pub struct FixtureDirectory {
    inner: Arc<Inner>,
}

impl FixtureDirectory {
    /// Build a directory over `fixture`. Later duplicates of an id are ignored.
    pub fn new(fixture: DirectoryFixture) -> Self {
        let mut by_id = HashMap::with_capacity(fixture.users.len());
        for (index, user) in fixture.users.iter().enumerate() {
            by_id.entry(user.id.clone()).or_insert(index);
        }
        Self {
            inner: Arc::new(Inner { fixture, by_id }),
        }
    }

    /// Load a fixture from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid fixture.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let fixture: DirectoryFixture = serde_json::from_str(&content)
            .map_err(|e| ProfileError::Directory(format!("{}: {e}", path.display())))?;
        tracing::info!(
            path = %path.display(),
            users = fixture.users.len(),
            "loaded directory fixture"
        );
        Ok(Self::new(fixture))
    }

    fn user(&self, id: &str) -> Option<&FixtureUser> {
        self.inner
            .by_id
            .get(id)
            .map(|&index| &self.inner.fixture.users[index])
    }

    fn users(&self) -> impl Iterator<Item = &FixtureUser> {
        self.inner.fixture.users.iter()
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl DirectoryIdentitySearch for FixtureDirectory {
    async fn find_identifiers_by_name_or_email(
        &self,
        text: &str,
    ) -> std::result::Result<Vec<String>, SearchError> {
        Ok(self
            .users()
            .filter(|u| u.has_profile && u.matches_name_or_email(text))
            .map(|u| u.id.clone())
            .collect())
    }

    async fn find_identifiers_by_interest(
        &self,
        text: &str,
        include_extended_bio: bool,
    ) -> std::result::Result<Vec<String>, SearchError> {
        Ok(self
            .users()
            .filter(|u| u.has_profile && u.matches_interest(text, include_extended_bio))
            .map(|u| u.id.clone())
            .collect())
    }
}

impl UserDirectory for FixtureDirectory {
    async fn resolve(&self, ids: &[String]) -> std::result::Result<Vec<UserRecord>, SearchError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.user(id))
            .map(FixtureUser::record)
            .collect())
    }

    async fn search_local(&self, text: &str) -> std::result::Result<Vec<UserRecord>, SearchError> {
        Ok(self
            .users()
            .filter(|u| !u.external && u.matches_name_or_email(text))
            .map(FixtureUser::record)
            .collect())
    }

    async fn search_external(
        &self,
        text: &str,
    ) -> std::result::Result<Vec<UserRecord>, SearchError> {
        Ok(self
            .users()
            .filter(|u| u.external && u.matches_name_or_email(text))
            .map(FixtureUser::record)
            .collect())
    }

    async fn is_privileged_caller(&self) -> std::result::Result<bool, SearchError> {
        Ok(self.inner.fixture.privileged)
    }

    async fn invisible_user_ids(&self) -> std::result::Result<Vec<String>, SearchError> {
        Ok(self.inner.fixture.invisible.clone())
    }

    fn max_result_count(&self) -> i64 {
        self.inner.fixture.max_results
    }
}

impl ProfileEnrichment for FixtureDirectory {
    async fn project(
        &self,
        records: Vec<UserRecord>,
    ) -> std::result::Result<Vec<Person>, SearchError> {
        Ok(records
            .into_iter()
            .map(|record| {
                let profile = self.user(&record.id);
                Person {
                    interests: profile.map(|p| p.interests.clone()).unwrap_or_default(),
                    extended_bio: profile.and_then(|p| p.extended_bio.clone()),
                    id: record.id,
                    display_name: record.display_name,
                    email: record.email,
                }
            })
            .collect())
    }
}
