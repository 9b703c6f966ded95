//! Time-boxed response memoization with stale-while-revalidate
//!
//! A fresh entry is served as-is. A stale entry that is still retained is
//! served immediately while one background task refreshes it. Anything older
//! is fetched inline.

use crate::config::CacheConfig;
use crate::error::Result;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Age class of a cached entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    Fresh,
    Stale,
    Expired,
}

#[derive(Debug, Clone)]
struct CachedEntry {
    value: Value,
    fetched_at: Instant,
}

#[derive(Debug, Clone)]
pub struct ResponseCache {
    fresh_for: Duration,
    retain_for: Duration,
    entries: Arc<RwLock<HashMap<String, CachedEntry>>>,
    /// Keys with a background refresh running
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            fresh_for: config.fresh_for(),
            retain_for: config.retain_for(),
            entries: Arc::new(RwLock::new(HashMap::new())),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    fn classify(&self, fetched_at: Instant) -> Freshness {
        let age = fetched_at.elapsed();
        if age < self.fresh_for {
            Freshness::Fresh
        } else if age < self.retain_for {
            Freshness::Stale
        } else {
            Freshness::Expired
        }
    }

    /// Age class of the entry under `key`, `None` when absent
    pub async fn freshness(&self, key: &str) -> Option<Freshness> {
        let entries = self.entries.read().await;
        entries.get(key).map(|entry| self.classify(entry.fetched_at))
    }

    /// Serve `key` from the cache, calling `fetch` when it must be refreshed
    ///
    /// `fetch` is called at most once: inline when nothing usable is cached,
    /// or on a spawned task when the entry is stale.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let cached = {
            let entries = self.entries.read().await;
            entries.get(key).map(|entry| (entry.value.clone(), self.classify(entry.fetched_at)))
        };

        match cached {
            Some((value, Freshness::Fresh)) => {
                debug!("Cache hit for {}", key);
                Ok(value)
            }
            Some((value, Freshness::Stale)) => {
                self.spawn_refresh(key, fetch()).await;
                debug!("Serving stale entry for {}", key);
                Ok(value)
            }
            Some((_, Freshness::Expired)) | None => {
                debug!("Cache miss for {}", key);
                let value = fetch().await;
                match value {
                    Ok(value) => {
                        self.insert(key, value.clone()).await;
                        Ok(value)
                    }
                    Err(e) => {
                        self.entries.write().await.remove(key);
                        Err(e)
                    }
                }
            }
        }
    }

    async fn spawn_refresh<Fut>(&self, key: &str, refresh: Fut)
    where
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        if !self.in_flight.lock().await.insert(key.to_string()) {
            debug!("Refresh already running for {}", key);
            return;
        }

        let cache = self.clone();
        let key = key.to_string();
        tokio::spawn(async move {
            match refresh.await {
                Ok(value) => {
                    cache.insert(&key, value).await;
                    debug!("Refreshed {}", key);
                }
                // The stale entry keeps being served until it expires
                Err(e) => warn!("Background refresh of {} failed: {}", key, e),
            }
            cache.in_flight.lock().await.remove(&key);
        });
    }

    pub async fn insert(&self, key: &str, value: Value) {
        let entry = CachedEntry { value, fetched_at: Instant::now() };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    pub async fn is_refreshing(&self, key: &str) -> bool {
        self.in_flight.lock().await.contains(key)
    }

    /// Drop entries past the retention window
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        let retain_for = self.retain_for;
        entries.retain(|_, entry| entry.fetched_at.elapsed() < retain_for);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_test::{assert_err, assert_ok};

    fn cache() -> ResponseCache {
        ResponseCache::new(CacheConfig { fresh_secs: 300, retain_secs: 3600 })
    }

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        value: Value,
    ) -> impl FnOnce() -> std::pin::Pin<Box<dyn Future<Output = Result<Value>> + Send>> {
        let calls = calls.clone();
        move || {
            Box::pin(async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(value)
            })
        }
    }

    async fn wait_for_refresh(cache: &ResponseCache, key: &str) {
        while cache.is_refreshing(key).await {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_entry_served_without_fetching() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));

        let first =
            assert_ok!(cache.get_or_fetch("rosters", counting_fetch(&calls, json!([1]))).await);
        let second =
            assert_ok!(cache.get_or_fetch("rosters", counting_fetch(&calls, json!([2]))).await);

        assert_eq!(first, json!([1]));
        assert_eq!(second, json!([1]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.freshness("rosters").await, Some(Freshness::Fresh));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_entry_served_then_refreshed() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));

        assert_ok!(cache.get_or_fetch("users", counting_fetch(&calls, json!("old"))).await);
        tokio::time::advance(Duration::from_secs(301)).await;
        assert_eq!(cache.freshness("users").await, Some(Freshness::Stale));

        let served =
            assert_ok!(cache.get_or_fetch("users", counting_fetch(&calls, json!("new"))).await);
        assert_eq!(served, json!("old"));

        wait_for_refresh(&cache, "users").await;

        let refreshed =
            assert_ok!(cache.get_or_fetch("users", counting_fetch(&calls, json!("x"))).await);
        assert_eq!(refreshed, json!("new"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_fetched_inline() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));

        assert_ok!(cache.get_or_fetch("league", counting_fetch(&calls, json!(1))).await);
        tokio::time::advance(Duration::from_secs(3601)).await;
        assert_eq!(cache.freshness("league").await, Some(Freshness::Expired));

        let value =
            assert_ok!(cache.get_or_fetch("league", counting_fetch(&calls, json!(2))).await);
        assert_eq!(value, json!(2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keys_are_independent() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));

        assert_ok!(cache.get_or_fetch("matchups:3", counting_fetch(&calls, json!(3))).await);
        let week4 =
            assert_ok!(cache.get_or_fetch("matchups:4", counting_fetch(&calls, json!(4))).await);

        assert_eq!(week4, json!(4));
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_not_cached() {
        let cache = cache();

        let result = cache
            .get_or_fetch("research:5", || async {
                Err(FetchError::Status { url: "https://example.test".to_string(), status: 503 })
            })
            .await;

        assert_err!(result);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_keeps_stale_entry() {
        let cache = cache();
        let calls = Arc::new(AtomicUsize::new(0));

        assert_ok!(cache.get_or_fetch("stats:2", counting_fetch(&calls, json!("kept"))).await);
        tokio::time::advance(Duration::from_secs(600)).await;

        let served = cache
            .get_or_fetch("stats:2", || async {
                Err(FetchError::Status { url: "https://example.test".to_string(), status: 500 })
            })
            .await;
        assert_eq!(assert_ok!(served), json!("kept"));

        wait_for_refresh(&cache, "stats:2").await;
        assert_eq!(cache.freshness("stats:2").await, Some(Freshness::Stale));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = cache();
        cache.insert("old", json!(1)).await;
        tokio::time::advance(Duration::from_secs(3000)).await;
        cache.insert("recent", json!(2)).await;
        tokio::time::advance(Duration::from_secs(700)).await;

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.freshness("recent").await, Some(Freshness::Stale));
    }
}
