//! Shared query cache.
//!
//! Every data-access service holds a clone of the same [`QueryCache`]. Results are stored under a
//! [`QueryKey`] and served until they go stale or get invalidated. Writes never patch cached
//! data: they invalidate the key and the next read refetches.

use std::{
    any::Any,
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    sync::Arc,
    time::{Duration, Instant},
};

use derive_more::Display;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex as FetchLock, broadcast};
use tracing::{debug, trace};

const EVENT_CAPACITY: usize = 64;

/// Identifies one cached collection, e.g. `"customers"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QueryKey {
    fn from(key: &str) -> Self {
        Self(key.to_owned())
    }
}

/// Emitted to subscribers whenever an entry changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    Stored(QueryKey),
    Invalidated(QueryKey),
    Evicted(QueryKey),
}

/// Freshness and retention windows for a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryOptions {
    /// How long a result is served without refetching.
    #[serde(with = "seconds")]
    pub stale_time: Duration,
    /// How long an unread result is kept before it is evicted.
    #[serde(with = "seconds")]
    pub cache_time: Duration,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            cache_time: Duration::from_secs(10 * 60),
        }
    }
}

mod seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
    last_read: Instant,
    cache_time: Duration,
    invalidated: bool,
}

impl Entry {
    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.invalidated && self.fetched_at.elapsed() < stale_time
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<QueryKey, Entry>,
    /// Bumped on every invalidation so a fetch that started earlier can't store a fresh result.
    generations: HashMap<QueryKey, u64>,
    /// Held while a key is being fetched. Concurrent readers of the same key wait on it and then
    /// reuse the stored result.
    fetches: HashMap<QueryKey, Arc<FetchLock<()>>>,
}

impl Inner {
    fn generation(&self, key: &QueryKey) -> u64 {
        self.generations.get(key).copied().unwrap_or_default()
    }

    fn fetch_lock(&mut self, key: &QueryKey) -> Arc<FetchLock<()>> {
        self.fetches.entry(key.clone()).or_default().clone()
    }
}

#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<RwLock<Inner>>,
    events: broadcast::Sender<CacheEvent>,
}

impl QueryCache {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            events,
        }
    }

    /// Receive a [`CacheEvent`] for every store, invalidation and eviction from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.events.subscribe()
    }

    /// Return the cached value for `key` if it is still fresh.
    pub fn get<T>(&self, key: &QueryKey, stale_time: Duration) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let mut inner = self.inner.write();
        let entry = inner.entries.get_mut(key)?;

        if !entry.is_fresh(stale_time) {
            return None;
        }

        entry.last_read = Instant::now();
        entry.value.downcast_ref::<T>().cloned()
    }

    /// Return the cached value for `key` whether fresh or not.
    pub fn peek<T>(&self, key: &QueryKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        self.inner
            .read()
            .entries
            .get(key)
            .and_then(|entry| entry.value.downcast_ref::<T>().cloned())
    }

    pub fn set<T>(&self, key: &QueryKey, value: T, cache_time: Duration)
    where
        T: Send + Sync + 'static,
    {
        let now = Instant::now();
        self.inner.write().entries.insert(
            key.clone(),
            Entry {
                value: Arc::new(value),
                fetched_at: now,
                last_read: now,
                cache_time,
                invalidated: false,
            },
        );

        self.emit(CacheEvent::Stored(key.clone()));
    }

    /// Mark `key` stale so the next read refetches. Returns whether anything was cached.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let cached = {
            let mut inner = self.inner.write();
            let generation = inner.generations.entry(key.clone()).or_default();
            *generation = generation.wrapping_add(1);

            match inner.entries.get_mut(key) {
                Some(entry) => {
                    entry.invalidated = true;
                    true
                }
                None => false,
            }
        };

        debug!(%key, cached, "Invalidated query");
        self.emit(CacheEvent::Invalidated(key.clone()));

        cached
    }

    /// Whether a read of `key` would go to the server.
    pub fn is_stale(&self, key: &QueryKey, stale_time: Duration) -> bool {
        self.inner
            .read()
            .entries
            .get(key)
            .is_none_or(|entry| !entry.is_fresh(stale_time))
    }

    /// Drop every entry that has not been read within its retention window. Returns the number of
    /// evicted entries.
    pub fn collect_garbage(&self) -> usize {
        let evicted: Vec<QueryKey> = {
            let mut inner = self.inner.write();
            let expired: Vec<QueryKey> = inner
                .entries
                .iter()
                .filter(|(_, entry)| entry.last_read.elapsed() >= entry.cache_time)
                .map(|(key, _)| key.clone())
                .collect();

            for key in &expired {
                inner.entries.remove(key);
            }

            expired
        };

        for key in &evicted {
            trace!(%key, "Evicted query");
            self.emit(CacheEvent::Evicted(key.clone()));
        }

        evicted.len()
    }

    /// Serve `key` from the cache when fresh, otherwise run `fetcher` and cache its result.
    ///
    /// Only one fetch per key runs at a time. Callers arriving while it runs wait for it and get
    /// its result from the cache; if it failed or went stale meanwhile they fetch themselves.
    ///
    /// Errors are returned as-is and never cached. A result whose fetch overlapped an
    /// invalidation of `key` is stored already stale.
    pub async fn fetch<T, E, F, Fut>(
        &self,
        key: &QueryKey,
        options: QueryOptions,
        fetcher: F,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.collect_garbage();

        if let Some(value) = self.get::<T>(key, options.stale_time) {
            debug!(%key, "Query served from cache");
            return Ok(value);
        }

        let lock = self.inner.write().fetch_lock(key);
        let _fetching = lock.lock().await;

        if let Some(value) = self.get::<T>(key, options.stale_time) {
            debug!(%key, "Query served from a concurrent fetch");
            return Ok(value);
        }

        let generation = self.inner.read().generation(key);
        debug!(%key, "Query fetching");
        let value = fetcher().await?;

        self.set(key, value.clone(), options.cache_time);

        if self.inner.read().generation(key) != generation {
            if let Some(entry) = self.inner.write().entries.get_mut(key) {
                entry.invalidated = true;
            }
        }

        Ok(value)
    }

    fn emit(&self, event: CacheEvent) {
        // Nobody listening is fine
        let _ = self.events.send(event);
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for QueryCache {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("QueryCache")
            .field("keys", &inner.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn key() -> QueryKey {
        "customers".into()
    }

    async fn fetch_counting(cache: &QueryCache, calls: &AtomicUsize, options: QueryOptions) -> u32 {
        cache
            .fetch(&key(), options, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, ()>(7)
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_fresh_result_is_reused() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        fetch_counting(&cache, &calls, QueryOptions::default()).await;
        fetch_counting(&cache, &calls, QueryOptions::default()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);

        fetch_counting(&cache, &calls, QueryOptions::default()).await;
        assert!(cache.invalidate(&key()));
        assert!(cache.is_stale(&key(), QueryOptions::default().stale_time));
        fetch_counting(&cache, &calls, QueryOptions::default()).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_zero_stale_time_always_fetches() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let options = QueryOptions {
            stale_time: Duration::ZERO,
            ..Default::default()
        };

        fetch_counting(&cache, &calls, options).await;
        fetch_counting(&cache, &calls, options).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache = QueryCache::new();

        let result = cache
            .fetch(&key(), QueryOptions::default(), || async { Err::<u32, _>("down") })
            .await;

        assert_eq!(result, Err("down"));
        assert_eq!(cache.peek::<u32>(&key()), None);
    }

    #[tokio::test]
    async fn test_concurrent_fetches_share_one_request() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let fetcher = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok::<_, ()>(7u32)
        };

        let (first_key, second_key) = (key(), key());
        let (first, second) = tokio::join!(
            cache.fetch(&first_key, QueryOptions::default(), fetcher),
            cache.fetch(&second_key, QueryOptions::default(), fetcher),
        );

        assert_eq!((first, second), (Ok(7), Ok(7)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_waiter_fetches_after_failure() {
        let cache = QueryCache::new();
        let calls = AtomicUsize::new(0);
        let fetcher = || async {
            let call = calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            if call == 0 {
                Err("down")
            } else {
                Ok(7u32)
            }
        };

        let (first_key, second_key) = (key(), key());
        let (first, second) = tokio::join!(
            cache.fetch(&first_key, QueryOptions::default(), fetcher),
            cache.fetch(&second_key, QueryOptions::default(), fetcher),
        );

        assert_eq!((first, second), (Err("down"), Ok(7)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalidation_during_fetch_leaves_result_stale() {
        let cache = QueryCache::new();

        let value = cache
            .fetch(&key(), QueryOptions::default(), || {
                let cache = cache.clone();
                async move {
                    cache.invalidate(&key());
                    Ok::<_, ()>(1)
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 1);
        assert_eq!(cache.peek::<u32>(&key()), Some(1));
        assert!(cache.is_stale(&key(), QueryOptions::default().stale_time));
    }

    #[test]
    fn test_garbage_collection() {
        let cache = QueryCache::new();
        cache.set(&key(), 1u32, Duration::ZERO);
        cache.set(&"workers".into(), 2u32, Duration::from_secs(600));

        assert_eq!(cache.collect_garbage(), 1);
        assert_eq!(cache.peek::<u32>(&key()), None);
        assert_eq!(cache.peek::<u32>(&"workers".into()), Some(2));
    }

    #[test]
    fn test_subscribers_see_invalidations() {
        let cache = QueryCache::new();
        let mut events = cache.subscribe();

        assert!(!cache.invalidate(&key()));

        assert_eq!(events.try_recv().unwrap(), CacheEvent::Invalidated(key()));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_wrong_type_is_a_miss() {
        let cache = QueryCache::new();
        cache.set(&key(), 1u32, Duration::from_secs(60));

        assert_eq!(cache.get::<String>(&key(), Duration::from_secs(60)), None);
    }
}
