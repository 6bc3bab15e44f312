//! Bounded per-user search history.
//!
//! Each user owns a map of term text → [`SearchTerm`] stored under their
//! user id in a [`KeyedCache`]. Re-issuing a term refreshes it rather than
//! duplicating it, and once the map is full the oldest term is evicted.
//! Order comes from each term's sequence number; the cache itself is
//! unordered, so reads sort.
//!
//! Writes are load-modify-store against the cache and are serialised per
//! user by a fixed set of lock stripes. Reads take no lock and always see a
//! whole map.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tokio::sync::Mutex;

use crate::cache::{KeyedCache, MokaKeyedCache};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{History, SearchTerm, TermMap};

/// Remembers the last few distinct search terms of every user.
pub struct SearchHistoryStore<C> {
    cache: C,
    max_terms: usize,
    stripes: Vec<Mutex<()>>,
}

impl SearchHistoryStore<MokaKeyedCache<TermMap>> {
    /// Build a store over an in-process moka cache sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn in_memory(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let cache = MokaKeyedCache::new(config.history_cache_capacity, config.history_idle_seconds);
        Self::new(cache, config)
    }
}

impl<C> SearchHistoryStore<C>
where
    C: KeyedCache<TermMap>,
{
    /// Build a store over `cache`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn new(cache: C, config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let stripes = (0..config.lock_stripes).map(|_| Mutex::new(())).collect();
        Ok(Self {
            cache,
            max_terms: config.max_search_history,
            stripes,
        })
    }

    /// Maximum number of terms kept per user.
    pub fn max_terms(&self) -> usize {
        self.max_terms
    }

    /// All of `user_id`'s terms, oldest first, or [`History::Absent`] if
    /// the user has no history entry.
    pub async fn get_history(&self, user_id: &str) -> History {
        match self.cache.get(user_id).await {
            Some(map) => History::Terms(sorted(map)),
            None => History::Absent,
        }
    }

    /// The most recent term `user_id` searched for, if any.
    pub async fn get_last_search_term(&self, user_id: &str) -> Option<SearchTerm> {
        self.get_history(user_id).await.into_terms()?.pop()
    }

    /// Record `term` as the most recent search of `user_id`.
    ///
    /// An existing entry with the same text is removed before the size
    /// check, so refreshing a term never evicts another one. If the history
    /// is still full, the oldest term is evicted.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidArgument`] without touching stored
    /// state if `term` is absent, has no owner, or is owned by a different
    /// user.
    pub async fn add_search_term_to_history(
        &self,
        user_id: &str,
        term: Option<SearchTerm>,
    ) -> Result<(), SearchError> {
        let term = term.ok_or_else(|| {
            SearchError::InvalidArgument("search term cannot be absent".into())
        })?;
        if term.user_id.is_empty() {
            return Err(SearchError::InvalidArgument(
                "search term must carry the id of its user".into(),
            ));
        }
        if term.user_id != user_id {
            return Err(SearchError::InvalidArgument(
                "user id must match the search term's user id".into(),
            ));
        }

        let _guard = self.stripe(user_id).lock().await;

        let mut map = self.cache.get(user_id).await.unwrap_or_default();
        map.remove(&term.term);

        if map.len() >= self.max_terms {
            if let Some(oldest) = map.values().min().map(|t| t.term.clone()) {
                tracing::trace!(evicted = %oldest, "evicting oldest search term");
                map.remove(&oldest);
            }
        }

        map.insert(term.term.clone(), term);
        let size = map.len();
        self.cache.put(user_id.to_string(), map).await;
        tracing::debug!(size, "search history updated");
        Ok(())
    }

    /// Drop all of `user_id`'s history.
    ///
    /// Clearing a user without history is not an error; it is logged and
    /// otherwise ignored.
    pub async fn clear_search_history(&self, user_id: &str) {
        let _guard = self.stripe(user_id).lock().await;
        if self.cache.contains_key(user_id).await {
            self.cache.remove(user_id).await;
        } else {
            tracing::warn!(user_id, "unable to clear search history; no entry for user");
        }
    }

    fn stripe(&self, user_id: &str) -> &Mutex<()> {
        let mut hasher = DefaultHasher::new();
        user_id.hash(&mut hasher);
        let index = (hasher.finish() % self.stripes.len() as u64) as usize;
        &self.stripes[index]
    }
}

fn sorted(map: TermMap) -> Vec<SearchTerm> {
    let mut terms: Vec<SearchTerm> = map.into_values().collect();
    terms.sort();
    terms
}
