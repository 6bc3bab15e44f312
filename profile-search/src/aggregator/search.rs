//! Core aggregator: per-source fan-out, merge, dedup, cap, filter, enrich.
//!
//! Sources are queried under a per-source timeout and circuit breaker. A
//! source that fails contributes nothing and is reported in
//! [`SearchResultSet::failed_sources`]; the request only fails when no
//! source succeeds. Resolution, visibility, and enrichment failures are
//! never swallowed.

use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use crate::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::provider::{DirectoryIdentitySearch, ProfileEnrichment, UserDirectory};
use crate::types::{SearchResultSet, SearchSource, UserRecord};

use super::dedup::{deduplicate, merge_in_order};
use super::limit::apply_cap;
use super::visibility::remove_invisible_users;

/// What one source produced for one request.
enum SourceOutcome<T> {
    Found(T),
    Failed(SearchError),
    Skipped,
}

/// Bookkeeping for sources that did not contribute.
#[derive(Default)]
struct SourceFailures {
    sources: Vec<SearchSource>,
    reasons: Vec<String>,
    succeeded: usize,
}

impl SourceFailures {
    fn take<T: Default>(&mut self, source: SearchSource, outcome: SourceOutcome<T>) -> T {
        match outcome {
            SourceOutcome::Found(value) => {
                self.succeeded += 1;
                value
            }
            SourceOutcome::Failed(err) => {
                self.sources.push(source);
                self.reasons.push(format!("{source}: {err}"));
                T::default()
            }
            SourceOutcome::Skipped => {
                self.sources.push(source);
                self.reasons.push(format!("{source}: circuit open"));
                T::default()
            }
        }
    }

    fn into_result(self) -> Result<Vec<SearchSource>, SearchError> {
        if self.succeeded == 0 {
            return Err(SearchError::AllSourcesFailed(self.reasons.join("; ")));
        }
        Ok(self.sources)
    }
}

/// Merges people search results from the profile store and the user
/// directory into one capped, deduplicated, visibility-filtered list.
pub struct ResultAggregator<I, D, P> {
    identity: I,
    directory: D,
    enrichment: P,
    config: SearchConfig,
    breaker: Mutex<CircuitBreaker>,
}

impl<I, D, P> ResultAggregator<I, D, P>
where
    I: DirectoryIdentitySearch,
    D: UserDirectory,
    P: ProfileEnrichment,
{
    /// Build an aggregator over the given collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if `config` is invalid.
    pub fn new(
        identity: I,
        directory: D,
        enrichment: P,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        let breaker = CircuitBreaker::new(CircuitBreakerConfig::from(&config));
        Ok(Self {
            identity,
            directory,
            enrichment,
            config,
            breaker: Mutex::new(breaker),
        })
    }

    /// The configuration this aggregator runs with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Circuit state of every source, in merge order.
    pub fn source_health(&self) -> Vec<(SearchSource, CircuitState, u32)> {
        self.breaker
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .health_report()
    }

    /// Find people by name or email across all three sources.
    ///
    /// # Pipeline
    ///
    /// 1. Identity source: matching identifiers, resolved to user records
    /// 2. Local directory search
    /// 3. External directory search
    /// 4. Concatenate in that order
    /// 5. Deduplicate by identifier, first occurrence wins
    /// 6. Cap at the directory's maximum result count
    /// 7. Remove users invisible to the caller
    /// 8. Enrich into [`crate::types::Person`] values
    ///
    /// Steps 1-3 run concurrently when `concurrent_sources` is set; the merge
    /// order does not change.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::AllSourcesFailed`] when no source succeeds,
    /// and propagates resolution, visibility, and enrichment failures.
    pub async fn find_by_name_or_email(&self, query: &str) -> Result<SearchResultSet, SearchError> {
        tracing::trace!(query, "name or email search");

        let identity = self.query_source(
            SearchSource::Identity,
            self.identity.find_identifiers_by_name_or_email(query),
        );
        let local =
            self.query_source(SearchSource::LocalDirectory, self.directory.search_local(query));
        let external = self.query_source(
            SearchSource::ExternalDirectory,
            self.directory.search_external(query),
        );

        let (identity, local, external) = if self.config.concurrent_sources {
            futures::join!(identity, local, external)
        } else {
            (identity.await, local.await, external.await)
        };

        let mut failures = SourceFailures::default();
        let identity_ids: Vec<String> = failures.take(SearchSource::Identity, identity);
        let local = failures.take(SearchSource::LocalDirectory, local);
        let external = failures.take(SearchSource::ExternalDirectory, external);
        let failed_sources = failures.into_result()?;

        let identity_users = self.resolve(&identity_ids).await?;
        tracing::debug!(
            identity = identity_users.len(),
            local = local.len(),
            external = external.len(),
            "sources returned candidates"
        );

        let candidates = deduplicate(merge_in_order([identity_users, local, external]));
        self.finish(candidates, failed_sources).await
    }

    /// Find people whose interests (and optionally extended biography)
    /// match `query`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::AllSourcesFailed`] if the interest lookup
    /// fails or is skipped, and propagates resolution, visibility, and
    /// enrichment failures. The interest lookup has its own circuit, so
    /// failing name lookups never block it.
    pub async fn find_by_interest(
        &self,
        query: &str,
        include_extended_bio: bool,
    ) -> Result<SearchResultSet, SearchError> {
        tracing::trace!(query, include_extended_bio, "interest search");

        let outcome = self
            .query_source(
                SearchSource::Interests,
                self.identity.find_identifiers_by_interest(query, include_extended_bio),
            )
            .await;
        let mut failures = SourceFailures::default();
        let ids: Vec<String> = failures.take(SearchSource::Interests, outcome);
        let failed_sources = failures.into_result()?;

        let candidates = self.resolve(&ids).await?;
        self.finish(candidates, failed_sources).await
    }

    /// Shared tail: cap, drop invisible users, enrich.
    async fn finish(
        &self,
        mut candidates: Vec<UserRecord>,
        failed_sources: Vec<SearchSource>,
    ) -> Result<SearchResultSet, SearchError> {
        let found = candidates.len();
        let max_results = self.directory.max_result_count();
        let truncated = apply_cap(&mut candidates, max_results);
        tracing::debug!(found, max_results, truncated, "capped candidates");

        let visible = remove_invisible_users(&self.directory, candidates).await?;
        let people = self.enrichment.project(visible).await?;

        Ok(SearchResultSet {
            people,
            truncated,
            failed_sources,
        })
    }

    async fn resolve(&self, ids: &[String]) -> Result<Vec<UserRecord>, SearchError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.directory.resolve(ids).await
    }

    /// Run one source call under the circuit breaker and timeout.
    async fn query_source<T, F>(&self, source: SearchSource, call: F) -> SourceOutcome<T>
    where
        F: Future<Output = Result<T, SearchError>>,
    {
        let allowed = self
            .breaker
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .should_attempt(source);
        if !allowed {
            tracing::warn!(%source, "skipping source with open circuit");
            return SourceOutcome::Skipped;
        }

        let limit = Duration::from_millis(self.config.source_timeout_ms);
        let result = match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout(format!(
                "{source} exceeded {}ms",
                self.config.source_timeout_ms
            ))),
        };

        let mut breaker = self.breaker.lock().unwrap_or_else(|e| e.into_inner());
        match result {
            Ok(value) => {
                breaker.record_success(source);
                SourceOutcome::Found(value)
            }
            Err(err) => {
                tracing::warn!(%source, error = %err, "source query failed");
                breaker.record_failure(source);
                SourceOutcome::Failed(err)
            }
        }
    }
}
