//! Keyed cache substrate for per-user search history.
//!
//! [`KeyedCache`] is the minimal get/put/remove/contains contract the
//! history store needs; it makes no ordering promises. [`MokaKeyedCache`]
//! backs it with [`moka`], giving bounded capacity and optional idle expiry,
//! so history lives only as long as its cache entry.

use std::future::Future;
use std::time::Duration;

use moka::future::Cache;

/// A string-keyed cache holding whole values.
///
/// `get` returns an owned snapshot; mutating it has no effect until it is
/// written back with `put`.
pub trait KeyedCache<V>: Send + Sync
where
    V: Clone + Send + Sync + 'static,
{
    /// Whether an entry exists for `key`.
    fn contains_key(&self, key: &str) -> impl Future<Output = bool> + Send;

    /// Snapshot of the entry for `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Option<V>> + Send;

    /// Insert or replace the entry for `key`.
    fn put(&self, key: String, value: V) -> impl Future<Output = ()> + Send;

    /// Remove the entry for `key`. Removing a missing key is a no-op.
    fn remove(&self, key: &str) -> impl Future<Output = ()> + Send;
}

/// [`KeyedCache`] backed by an in-process [`moka::future::Cache`].
#[derive(Clone)]
pub struct MokaKeyedCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<String, V>,
}

impl<V> MokaKeyedCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache holding at most `max_capacity` entries.
    ///
    /// With a non-zero `idle_seconds`, entries not read or written for that
    /// long are dropped.
    pub fn new(max_capacity: u64, idle_seconds: u64) -> Self {
        let mut builder = Cache::builder().max_capacity(max_capacity);
        if idle_seconds > 0 {
            builder = builder.time_to_idle(Duration::from_secs(idle_seconds));
        }
        Self {
            inner: builder.build(),
        }
    }
}

impl<V> KeyedCache<V> for MokaKeyedCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    async fn get(&self, key: &str) -> Option<V> {
        self.inner.get(key).await
    }

    async fn put(&self, key: String, value: V) {
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }
}
