//! People search façade: run searches and remember what each user searched for.

use profile_search::circuit_breaker::CircuitState;
use profile_search::{
    DirectoryIdentitySearch, History, KeyedCache, MokaKeyedCache, ProfileEnrichment,
    ResultAggregator, SearchHistoryStore, SearchKind, SearchResultSet, SearchSource, SearchTerm,
    TermMap, UserDirectory,
};

use crate::config::ProfileConfig;
use crate::directory::{DirectoryFixture, FixtureDirectory};
use crate::error::Result;

/// Combines a [`ResultAggregator`] with a [`SearchHistoryStore`].
///
/// Every search issued through [`ProfileSearchService::search`] is recorded
/// in the caller's history before it runs, so a failed search can still be
/// retried from history.
pub struct ProfileSearchService<I, D, P, C> {
    aggregator: ResultAggregator<I, D, P>,
    history: SearchHistoryStore<C>,
}

/// Service over the JSON fixture directory and an in-process history cache.
pub type FixtureSearchService = ProfileSearchService<
    FixtureDirectory,
    FixtureDirectory,
    FixtureDirectory,
    MokaKeyedCache<TermMap>,
>;

impl FixtureSearchService {
    /// Build a service from host configuration, loading the directory
    /// fixture if one is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the search configuration is invalid or the
    /// fixture cannot be loaded.
    pub fn from_config(config: &ProfileConfig) -> Result<Self> {
        let directory = match &config.directory.fixture_path {
            Some(path) => FixtureDirectory::from_file(path)?,
            None => FixtureDirectory::new(DirectoryFixture::default()),
        };
        Self::with_directory(directory, config)
    }

    /// Build a service over an already loaded directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the search configuration is invalid.
    pub fn with_directory(directory: FixtureDirectory, config: &ProfileConfig) -> Result<Self> {
        let search_config = config.search_config();
        let history = SearchHistoryStore::in_memory(&search_config)?;
        let aggregator = ResultAggregator::new(
            directory.clone(),
            directory.clone(),
            directory,
            search_config,
        )?;
        Ok(Self::new(aggregator, history))
    }
}

impl<I, D, P, C> ProfileSearchService<I, D, P, C>
where
    I: DirectoryIdentitySearch,
    D: UserDirectory,
    P: ProfileEnrichment,
    C: KeyedCache<TermMap>,
{
    /// Assemble a service from its parts.
    pub fn new(aggregator: ResultAggregator<I, D, P>, history: SearchHistoryStore<C>) -> Self {
        Self {
            aggregator,
            history,
        }
    }

    /// Record `term` in `user_id`'s history, then search for it.
    ///
    /// `include_extended_bio` only applies to interest searches.
    ///
    /// # Errors
    ///
    /// Returns an error if the term cannot be recorded (empty user id) or
    /// the search fails.
    pub async fn search(
        &self,
        user_id: &str,
        term: &str,
        kind: SearchKind,
        include_extended_bio: bool,
    ) -> Result<SearchResultSet> {
        let entry = SearchTerm::new(user_id, term, kind);
        self.history
            .add_search_term_to_history(user_id, Some(entry))
            .await?;
        self.run(term, kind, include_extended_bio).await
    }

    /// Re-issue `user_id`'s most recent search, refreshing it in history.
    ///
    /// Returns `None` if the user has no history.
    ///
    /// # Errors
    ///
    /// Returns an error if the search fails.
    pub async fn rerun_last(
        &self,
        user_id: &str,
        include_extended_bio: bool,
    ) -> Result<Option<SearchResultSet>> {
        let Some(last) = self.history.get_last_search_term(user_id).await else {
            return Ok(None);
        };
        let results = self
            .search(user_id, &last.term, last.kind, include_extended_bio)
            .await?;
        Ok(Some(results))
    }

    /// `user_id`'s search history, oldest first.
    pub async fn history(&self, user_id: &str) -> History {
        self.history.get_history(user_id).await
    }

    /// `user_id`'s most recent search term.
    pub async fn last_term(&self, user_id: &str) -> Option<SearchTerm> {
        self.history.get_last_search_term(user_id).await
    }

    /// Forget `user_id`'s search history.
    pub async fn clear_history(&self, user_id: &str) {
        self.history.clear_search_history(user_id).await;
    }

    /// Circuit state of every search source.
    pub fn source_health(&self) -> Vec<(SearchSource, CircuitState, u32)> {
        self.aggregator.source_health()
    }

    async fn run(
        &self,
        term: &str,
        kind: SearchKind,
        include_extended_bio: bool,
    ) -> Result<SearchResultSet> {
        let results = match kind {
            SearchKind::Name => self.aggregator.find_by_name_or_email(term).await?,
            SearchKind::Interest => {
                self.aggregator
                    .find_by_interest(term, include_extended_bio)
                    .await?
            }
        };
        tracing::debug!(
            ?kind,
            count = results.len(),
            truncated = results.truncated,
            "search complete"
        );
        Ok(results)
    }
}
