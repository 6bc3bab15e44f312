//! In-memory collaborators for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::error::SearchError;
use crate::provider::{DirectoryIdentitySearch, ProfileEnrichment, UserDirectory};
use crate::types::{Person, SearchSource, UserRecord};

pub fn user(id: &str) -> UserRecord {
    UserRecord::new(id, format!("User {id}"))
}

pub fn users(ids: &[&str]) -> Vec<UserRecord> {
    ids.iter().map(|id| user(id)).collect()
}

#[derive(Default)]
pub struct MockIdentity {
    pub by_name: Vec<String>,
    pub by_interest: Vec<String>,
    pub by_extended_bio: Vec<String>,
    /// Fail every lookup.
    pub fail: bool,
    /// Fail only name-or-email lookups.
    pub fail_name_lookups: bool,
    pub interest_calls: AtomicUsize,
}

impl DirectoryIdentitySearch for MockIdentity {
    async fn find_identifiers_by_name_or_email(
        &self,
        _text: &str,
    ) -> Result<Vec<String>, SearchError> {
        if self.fail || self.fail_name_lookups {
            return Err(SearchError::Source {
                origin: SearchSource::Identity,
                message: "profile store offline".into(),
            });
        }
        Ok(self.by_name.clone())
    }

    async fn find_identifiers_by_interest(
        &self,
        _text: &str,
        include_extended_bio: bool,
    ) -> Result<Vec<String>, SearchError> {
        self.interest_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SearchError::Source {
                origin: SearchSource::Interests,
                message: "profile store offline".into(),
            });
        }
        let mut ids = self.by_interest.clone();
        if include_extended_bio {
            ids.extend(self.by_extended_bio.iter().cloned());
        }
        Ok(ids)
    }
}

pub struct MockDirectory {
    pub known: HashMap<String, UserRecord>,
    pub local: Vec<UserRecord>,
    pub external: Vec<UserRecord>,
    pub fail_local: bool,
    pub fail_external: bool,
    pub fail_visibility: bool,
    pub external_delay: Option<Duration>,
    pub privileged: bool,
    pub invisible: Vec<String>,
    pub max_results: i64,
    pub resolve_calls: AtomicUsize,
}

impl Default for MockDirectory {
    fn default() -> Self {
        Self {
            known: HashMap::new(),
            local: Vec::new(),
            external: Vec::new(),
            fail_local: false,
            fail_external: false,
            fail_visibility: false,
            external_delay: None,
            privileged: false,
            invisible: Vec::new(),
            max_results: 50,
            resolve_calls: AtomicUsize::new(0),
        }
    }
}

impl MockDirectory {
    /// Directory that can resolve every id in `ids`.
    pub fn knowing(ids: &[&str]) -> Self {
        Self {
            known: ids.iter().map(|id| (id.to_string(), user(id))).collect(),
            ..Default::default()
        }
    }
}

impl UserDirectory for MockDirectory {
    async fn resolve(&self, ids: &[String]) -> Result<Vec<UserRecord>, SearchError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ids
            .iter()
            .filter_map(|id| self.known.get(id).cloned())
            .collect())
    }

    async fn search_local(&self, _text: &str) -> Result<Vec<UserRecord>, SearchError> {
        if self.fail_local {
            return Err(SearchError::Source {
                origin: SearchSource::LocalDirectory,
                message: "directory unavailable".into(),
            });
        }
        Ok(self.local.clone())
    }

    async fn search_external(&self, _text: &str) -> Result<Vec<UserRecord>, SearchError> {
        if let Some(delay) = self.external_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_external {
            return Err(SearchError::Source {
                origin: SearchSource::ExternalDirectory,
                message: "provider returned 503".into(),
            });
        }
        Ok(self.external.clone())
    }

    async fn is_privileged_caller(&self) -> Result<bool, SearchError> {
        Ok(self.privileged)
    }

    async fn invisible_user_ids(&self) -> Result<Vec<String>, SearchError> {
        if self.fail_visibility {
            return Err(SearchError::Directory("privacy service offline".into()));
        }
        Ok(self.invisible.clone())
    }

    fn max_result_count(&self) -> i64 {
        self.max_results
    }
}

#[derive(Default)]
pub struct MockEnrichment {
    pub fail: bool,
}

impl ProfileEnrichment for MockEnrichment {
    async fn project(&self, records: Vec<UserRecord>) -> Result<Vec<Person>, SearchError> {
        if self.fail {
            return Err(SearchError::Enrichment("profile service offline".into()));
        }
        Ok(records
            .into_iter()
            .map(|r| Person {
                id: r.id,
                display_name: r.display_name,
                email: r.email,
                interests: Vec::new(),
                extended_bio: None,
            })
            .collect())
    }
}
