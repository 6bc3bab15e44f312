//! Core types for people search results, search sources, and history terms.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Process-wide source of strictly increasing history sequence numbers.
static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// A user record as returned by a directory. Opaque to the aggregator apart
/// from `id`, which is the deduplication key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Stable opaque identifier.
    pub id: String,
    /// Name shown in search results.
    pub display_name: String,
    /// Primary email address, if the directory exposes one.
    pub email: Option<String>,
}

impl UserRecord {
    /// Convenience constructor for a record without an email address.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            email: None,
        }
    }
}

/// The enriched profile projection handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Identifier of the underlying [`UserRecord`].
    pub id: String,
    /// Name shown in search results.
    pub display_name: String,
    /// Primary email address, if visible.
    pub email: Option<String>,
    /// Declared interests from the user's profile.
    #[serde(default)]
    pub interests: Vec<String>,
    /// Extended (business) biography, if the profile has one.
    #[serde(default)]
    pub extended_bio: Option<String>,
}

/// Outcome of one aggregation call. Rebuilt on every request, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultSet {
    /// Matching people in first-seen order.
    pub people: Vec<Person>,
    /// Whether the merged candidate list hit the result cap. Hosts use this
    /// to tell the user that more matches exist.
    pub truncated: bool,
    /// Sources that failed or were skipped while serving this request.
    #[serde(default)]
    pub failed_sources: Vec<SearchSource>,
}

impl SearchResultSet {
    /// Number of people in the result set.
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Whether the result set is empty.
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Identifiers of the returned people, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.people.iter().map(|p| p.id.as_str()).collect()
    }
}

/// Backing sources consulted by people searches.
///
/// A name-or-email search merges `Identity`, `LocalDirectory` and
/// `ExternalDirectory` in declaration order. An interest search consults
/// only `Interests`. Each source has its own circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchSource {
    /// Profile store name and email lookup returning identifiers.
    Identity,
    /// Local user directory.
    LocalDirectory,
    /// Federated or remote identity providers.
    ExternalDirectory,
    /// Profile store interest and biography lookup returning identifiers.
    Interests,
}

impl SearchSource {
    /// Returns the human-readable name of this source.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "Identity",
            Self::LocalDirectory => "LocalDirectory",
            Self::ExternalDirectory => "ExternalDirectory",
            Self::Interests => "Interests",
        }
    }

    /// Returns all sources in declaration order.
    pub fn all() -> &'static [SearchSource] {
        &[
            Self::Identity,
            Self::LocalDirectory,
            Self::ExternalDirectory,
            Self::Interests,
        ]
    }
}

impl fmt::Display for SearchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which kind of search a history term was issued as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    /// Search by name or email.
    #[default]
    Name,
    /// Search by interest.
    Interest,
}

/// A search term remembered in a user's history.
///
/// Terms are ordered by `sequence`, then by `term` text, which gives a
/// total order even when two terms share a sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTerm {
    /// Owner of this history entry.
    pub user_id: String,
    /// The text that was searched for. Unique within one user's history.
    pub term: String,
    /// What kind of search was issued.
    #[serde(default)]
    pub kind: SearchKind,
    /// Recency key. Larger is more recent.
    pub sequence: u64,
    /// Wall-clock time of the search in milliseconds since the Unix epoch.
    /// Display only; never used for ordering.
    #[serde(default)]
    pub searched_at_ms: u64,
}

impl SearchTerm {
    /// Create a term stamped with the next process-wide sequence number.
    pub fn new(user_id: impl Into<String>, term: impl Into<String>, kind: SearchKind) -> Self {
        let sequence = NEXT_SEQUENCE.fetch_add(1, AtomicOrdering::Relaxed);
        Self::with_sequence(user_id, term, kind, sequence)
    }

    /// Create a term with an explicit ordering value.
    pub fn with_sequence(
        user_id: impl Into<String>,
        term: impl Into<String>,
        kind: SearchKind,
        sequence: u64,
    ) -> Self {
        let searched_at_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            user_id: user_id.into(),
            term: term.into(),
            kind,
            sequence,
            searched_at_ms,
        }
    }
}

impl Ord for SearchTerm {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sequence
            .cmp(&other.sequence)
            .then_with(|| self.term.cmp(&other.term))
    }
}

impl PartialOrd for SearchTerm {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-user history state: term text → term.
pub type TermMap = HashMap<String, SearchTerm>;

/// Result of a history lookup.
///
/// `Absent` means no history entry exists for the user at all, which is
/// distinct from an entry holding zero terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "terms", rename_all = "snake_case")]
pub enum History {
    /// No history entry is cached for the user.
    Absent,
    /// Stored terms, oldest first.
    Terms(Vec<SearchTerm>),
}

impl History {
    /// Whether no history entry exists.
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Stored terms, oldest first. Empty when absent.
    pub fn terms(&self) -> &[SearchTerm] {
        match self {
            Self::Absent => &[],
            Self::Terms(terms) => terms,
        }
    }

    /// Consume into the stored terms, or `None` when absent.
    pub fn into_terms(self) -> Option<Vec<SearchTerm>> {
        match self {
            Self::Absent => None,
            Self::Terms(terms) => Some(terms),
        }
    }
}
