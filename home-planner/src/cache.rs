//! Caching layer for planned timetable windows.
//!
//! Planned windows only change when the timetable itself changes, so they
//! are cached per (station, date, hour). Change feeds and realtime stop
//! events are what a refresh is for and always pass through.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::fetch::{FeedFetcher, FeedKind, FetchError};

/// Cache key for planned windows: (station id, local date, hour).
type WindowKey = (String, NaiveDate, u32);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached windows.
    pub ttl: Duration,

    /// Maximum number of cached windows.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
            max_capacity: 500,
        }
    }
}

/// Feed fetcher with planned-window caching.
pub struct CachedFeedFetcher<F> {
    inner: F,
    windows: MokaCache<WindowKey, Arc<String>>,
}

impl<F> CachedFeedFetcher<F> {
    /// Wrap a fetcher.
    pub fn new(inner: F, config: &CacheConfig) -> Self {
        let windows = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, windows }
    }

    /// Access the underlying fetcher for requests that bypass the cache.
    pub fn inner(&self) -> &F {
        &self.inner
    }

    /// Drop all cached windows.
    pub fn invalidate_all(&self) {
        self.windows.invalidate_all();
    }
}

impl<F> FeedFetcher for CachedFeedFetcher<F>
where
    F: FeedFetcher + Sync,
{
    async fn fetch(&self, station_id: &str, kind: FeedKind) -> Result<String, FetchError> {
        let FeedKind::PlannedWindow(window) = kind else {
            return self.inner.fetch(station_id, kind).await;
        };

        let key = (station_id.to_string(), window.date(), window.hour());
        if let Some(cached) = self.windows.get(&key).await {
            debug!(station_id, %window, "planned window cache hit");
            return Ok(cached.as_ref().clone());
        }

        let payload = self.inner.fetch(station_id, kind).await?;
        self.windows.insert(key, Arc::new(payload.clone())).await;
        Ok(payload)
    }
}
