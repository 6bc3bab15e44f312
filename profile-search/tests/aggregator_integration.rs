//! Integration tests for the people search aggregation pipeline.
//!
//! These tests drive [`ResultAggregator`] end to end through in-memory
//! collaborators: merge → dedup → cap → visibility → enrich.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use profile_search::circuit_breaker::CircuitState;
use profile_search::{
    DirectoryIdentitySearch, Person, ProfileEnrichment, ResultAggregator, SearchConfig,
    SearchError, SearchSource, UserDirectory, UserRecord,
};

fn record(id: &str) -> UserRecord {
    UserRecord {
        id: id.to_string(),
        display_name: format!("User {id}"),
        email: Some(format!("{id}@example.org")),
    }
}

fn records(ids: &[&str]) -> Vec<UserRecord> {
    ids.iter().map(|id| record(id)).collect()
}

#[derive(Default)]
struct Identity {
    by_name: Vec<String>,
    by_interest: Vec<String>,
    fail: bool,
    interest_calls: Arc<AtomicUsize>,
}

impl DirectoryIdentitySearch for Identity {
    async fn find_identifiers_by_name_or_email(
        &self,
        _text: &str,
    ) -> Result<Vec<String>, SearchError> {
        if self.fail {
            return Err(SearchError::Source {
                origin: SearchSource::Identity,
                message: "offline".into(),
            });
        }
        Ok(self.by_name.clone())
    }

    async fn find_identifiers_by_interest(
        &self,
        _text: &str,
        _include_extended_bio: bool,
    ) -> Result<Vec<String>, SearchError> {
        self.interest_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.by_interest.clone())
    }
}

struct Directory {
    known: HashMap<String, UserRecord>,
    local: Vec<UserRecord>,
    external: Vec<UserRecord>,
    external_delay: Option<Duration>,
    external_fails: Arc<AtomicBool>,
    external_calls: Arc<AtomicUsize>,
    privileged: bool,
    invisible: Vec<String>,
    max_results: i64,
}

impl Directory {
    fn new(max_results: i64) -> Self {
        Self {
            known: HashMap::new(),
            local: Vec::new(),
            external: Vec::new(),
            external_delay: None,
            external_fails: Arc::new(AtomicBool::new(false)),
            external_calls: Arc::new(AtomicUsize::new(0)),
            privileged: false,
            invisible: Vec::new(),
            max_results,
        }
    }

    fn knowing(mut self, ids: &[&str]) -> Self {
        for id in ids {
            self.known.insert(id.to_string(), record(id));
        }
        self
    }
}

impl UserDirectory for Directory {
    async fn resolve(&self, ids: &[String]) -> Result<Vec<UserRecord>, SearchError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.known.get(id).cloned())
            .collect())
    }

    async fn search_local(&self, _text: &str) -> Result<Vec<UserRecord>, SearchError> {
        Ok(self.local.clone())
    }

    async fn search_external(&self, _text: &str) -> Result<Vec<UserRecord>, SearchError> {
        self.external_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.external_delay {
            tokio::time::sleep(delay).await;
        }
        if self.external_fails.load(Ordering::SeqCst) {
            return Err(SearchError::Source {
                origin: SearchSource::ExternalDirectory,
                message: "503".into(),
            });
        }
        Ok(self.external.clone())
    }

    async fn is_privileged_caller(&self) -> Result<bool, SearchError> {
        Ok(self.privileged)
    }

    async fn invisible_user_ids(&self) -> Result<Vec<String>, SearchError> {
        Ok(self.invisible.clone())
    }

    fn max_result_count(&self) -> i64 {
        self.max_results
    }
}

struct Enrichment;

impl ProfileEnrichment for Enrichment {
    async fn project(&self, records: Vec<UserRecord>) -> Result<Vec<Person>, SearchError> {
        Ok(records
            .into_iter()
            .map(|r| Person {
                id: r.id,
                display_name: r.display_name,
                email: r.email,
                interests: vec!["enriched".into()],
                extended_bio: None,
            })
            .collect())
    }
}

fn build(
    identity: Identity,
    directory: Directory,
    config: SearchConfig,
) -> ResultAggregator<Identity, Directory, Enrichment> {
    ResultAggregator::new(identity, directory, Enrichment, config).expect("valid config")
}

/// maxResults=3; A=[u1,u2], B=[u2,u3], C=[]; u2 invisible → [u1,u3].
#[tokio::test]
async fn overlapping_sources_capped_then_filtered_without_backfill() {
    let identity = Identity {
        by_name: vec!["u1".into(), "u2".into()],
        ..Default::default()
    };
    let mut directory = Directory::new(3).knowing(&["u1", "u2"]);
    directory.local = records(&["u2", "u3"]);
    directory.invisible = vec!["u2".into()];

    let results = build(identity, directory, SearchConfig::default())
        .find_by_name_or_email("u")
        .await
        .expect("search");

    assert_eq!(results.ids(), vec!["u1", "u3"]);
    assert!(results.truncated, "three candidates reach a cap of three");
    assert!(results.people.iter().all(|p| p.interests == vec!["enriched"]));
}

#[tokio::test]
async fn privileged_caller_keeps_invisible_users() {
    let identity = Identity {
        by_name: vec!["u1".into(), "u2".into()],
        ..Default::default()
    };
    let mut directory = Directory::new(10).knowing(&["u1", "u2"]);
    directory.privileged = true;
    directory.invisible = vec!["u2".into()];

    let results = build(identity, directory, SearchConfig::default())
        .find_by_name_or_email("u")
        .await
        .expect("search");
    assert_eq!(results.ids(), vec!["u1", "u2"]);
}

#[tokio::test]
async fn truncation_happens_before_visibility_filtering() {
    let mut directory = Directory::new(2).knowing(&["u1"]);
    directory.local = records(&["u1", "u2", "u3", "u4"]);
    directory.invisible = vec!["u1".into()];

    let results = build(Identity::default(), directory, SearchConfig::default())
        .find_by_name_or_email("u")
        .await
        .expect("search");

    // Capped to [u1, u2] first, then u1 removed. u3 is not pulled in.
    assert_eq!(results.ids(), vec!["u2"]);
    assert!(results.truncated);
}

#[tokio::test]
async fn results_never_contain_duplicates_or_exceed_cap() {
    let identity = Identity {
        by_name: (0..8).map(|i| format!("u{i}")).collect(),
        ..Default::default()
    };
    let all: Vec<String> = (0..12).map(|i| format!("u{i}")).collect();
    let all_refs: Vec<&str> = all.iter().map(String::as_str).collect();
    let mut directory = Directory::new(7).knowing(&all_refs);
    directory.local = records(&all_refs[4..10]);
    directory.external = records(&all_refs[2..12]);

    let results = build(identity, directory, SearchConfig::default())
        .find_by_name_or_email("u")
        .await
        .expect("search");

    let unique: HashSet<&str> = results.ids().into_iter().collect();
    assert_eq!(unique.len(), results.len());
    assert_eq!(results.len(), 7);
    assert_eq!(results.ids(), all_refs[..7].to_vec());
}

#[tokio::test]
async fn zero_or_negative_cap_yields_empty_results() {
    for cap in [0, -1] {
        let mut directory = Directory::new(cap);
        directory.local = records(&["u1", "u2"]);
        let results = build(Identity::default(), directory, SearchConfig::default())
            .find_by_name_or_email("u")
            .await
            .expect("search");
        assert!(results.is_empty(), "cap {cap} should empty the result set");
    }
}

#[tokio::test]
async fn empty_query_is_delegated() {
    let mut directory = Directory::new(5);
    directory.local = records(&["u1"]);
    let results = build(Identity::default(), directory, SearchConfig::default())
        .find_by_name_or_email("")
        .await
        .expect("search");
    assert_eq!(results.ids(), vec!["u1"]);
}

/// Policy: a timed-out source contributes nothing; the request still succeeds.
#[tokio::test]
async fn slow_source_times_out_and_degrades() {
    let mut directory = Directory::new(10);
    directory.local = records(&["u1"]);
    directory.external = records(&["u2"]);
    directory.external_delay = Some(Duration::from_millis(500));

    let config = SearchConfig {
        source_timeout_ms: 20,
        ..Default::default()
    };
    let results = build(Identity::default(), directory, config)
        .find_by_name_or_email("u")
        .await
        .expect("partial results");

    assert_eq!(results.ids(), vec!["u1"]);
    assert_eq!(results.failed_sources, vec![SearchSource::ExternalDirectory]);
}

#[tokio::test]
async fn repeatedly_failing_source_is_skipped() {
    let mut directory = Directory::new(10);
    directory.local = records(&["u1"]);
    directory.external_fails.store(true, Ordering::SeqCst);

    let config = SearchConfig {
        breaker_failure_threshold: 2,
        breaker_cooldown_secs: 600,
        ..Default::default()
    };
    let aggregator = build(Identity::default(), directory, config);

    for _ in 0..3 {
        let results = aggregator
            .find_by_name_or_email("u")
            .await
            .expect("partial");
        assert_eq!(results.ids(), vec!["u1"]);
        assert_eq!(results.failed_sources, vec![SearchSource::ExternalDirectory]);
    }

    let health = aggregator.source_health();
    let external = health
        .iter()
        .find(|(source, _, _)| *source == SearchSource::ExternalDirectory)
        .expect("external tracked");
    assert_eq!(external.1, CircuitState::Open);
    // Third request was skipped, so only two failures were recorded.
    assert_eq!(external.2, 2);
}

#[tokio::test(start_paused = true)]
async fn skipped_source_is_retried_after_cooldown() {
    let mut directory = Directory::new(10);
    directory.local = records(&["u1"]);
    directory.external = records(&["u2"]);
    directory.external_fails.store(true, Ordering::SeqCst);
    let external_fails = Arc::clone(&directory.external_fails);
    let calls = Arc::clone(&directory.external_calls);

    let config = SearchConfig {
        breaker_failure_threshold: 2,
        breaker_cooldown_secs: 60,
        ..Default::default()
    };
    let aggregator = build(Identity::default(), directory, config);

    for _ in 0..3 {
        let results = aggregator
            .find_by_name_or_email("u")
            .await
            .expect("partial");
        assert_eq!(results.failed_sources, vec![SearchSource::ExternalDirectory]);
    }
    // Two failures opened the circuit; the third request never reached it.
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    external_fails.store(false, Ordering::SeqCst);
    tokio::time::advance(Duration::from_secs(30)).await;
    let results = aggregator
        .find_by_name_or_email("u")
        .await
        .expect("partial");
    assert_eq!(results.ids(), vec!["u1"]);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    tokio::time::advance(Duration::from_secs(31)).await;
    let results = aggregator
        .find_by_name_or_email("u")
        .await
        .expect("recovered");
    assert_eq!(results.ids(), vec!["u1", "u2"]);
    assert!(results.failed_sources.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let health = aggregator.source_health();
    assert!(health.contains(&(SearchSource::ExternalDirectory, CircuitState::Closed, 0)));
}

#[tokio::test]
async fn failing_name_lookups_do_not_block_interest_search() {
    let identity = Identity {
        by_interest: vec!["u1".into()],
        fail: true,
        ..Default::default()
    };
    let interest_calls = Arc::clone(&identity.interest_calls);
    let mut directory = Directory::new(10).knowing(&["u1"]);
    directory.local = records(&["u5"]);

    let aggregator = build(identity, directory, SearchConfig::default());
    for _ in 0..5 {
        let results = aggregator
            .find_by_name_or_email("smith")
            .await
            .expect("partial");
        assert_eq!(results.ids(), vec!["u5"]);
        assert_eq!(results.failed_sources, vec![SearchSource::Identity]);
    }

    let results = aggregator
        .find_by_interest("sailing", false)
        .await
        .expect("interest search");
    assert_eq!(results.ids(), vec!["u1"]);
    assert!(results.failed_sources.is_empty());
    assert_eq!(interest_calls.load(Ordering::SeqCst), 1);

    let health = aggregator.source_health();
    assert!(health.contains(&(SearchSource::Identity, CircuitState::Open, 3)));
    assert!(health.contains(&(SearchSource::Interests, CircuitState::Closed, 0)));
}

#[tokio::test]
async fn identity_failure_alone_degrades() {
    let identity = Identity {
        fail: true,
        ..Default::default()
    };
    let mut directory = Directory::new(10);
    directory.external = records(&["u7"]);
    let results = build(identity, directory, SearchConfig::default())
        .find_by_name_or_email("u")
        .await
        .expect("partial");
    assert_eq!(results.ids(), vec!["u7"]);
    assert_eq!(results.failed_sources, vec![SearchSource::Identity]);
}

#[tokio::test]
async fn interest_search_caps_and_filters() {
    let identity = Identity {
        by_interest: vec!["u1".into(), "u2".into(), "u3".into(), "u4".into()],
        ..Default::default()
    };
    let mut directory = Directory::new(3).knowing(&["u1", "u2", "u3", "u4"]);
    directory.invisible = vec!["u3".into()];

    let results = build(identity, directory, SearchConfig::default())
        .find_by_interest("rust", true)
        .await
        .expect("search");
    assert_eq!(results.ids(), vec!["u1", "u2"]);
    assert!(results.truncated);
}

#[tokio::test]
async fn interest_search_with_no_matches_is_empty() {
    let results = build(Identity::default(), Directory::new(5), SearchConfig::default())
        .find_by_interest("nothing", false)
        .await
        .expect("search");
    assert!(results.is_empty());
    assert!(!results.truncated);
}
