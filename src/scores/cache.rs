//! Per-sport schedule cache.
//!
//! Only the list of event ids is cached, never the game bodies, so every
//! request still sees current scores. An entry is fresh while it holds at
//! least one id and is younger than [`CACHE_INTERVAL_MS`]; an empty list is
//! always stale so an empty schedule is retried instead of pinned for ten
//! minutes. Failed refreshes never reach this cache.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::clock::Clock;
use super::models::{EventId, Sport};

/// How long a schedule stays fresh (10 minutes).
pub const CACHE_INTERVAL_MS: i64 = 10 * 60 * 1000;

/// Ids and refresh time are stored together and replaced as one value.
#[derive(Debug, Clone)]
struct CacheEntry {
    ids: Vec<EventId>,
    refreshed_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        !self.ids.is_empty() && (now - self.refreshed_at).num_milliseconds() < CACHE_INTERVAL_MS
    }
}

/// Thread-safe schedule cache shared by every request.
#[derive(Clone)]
pub struct ScheduleCache {
    inner: Arc<RwLock<HashMap<Sport, CacheEntry>>>,
    clock: Arc<dyn Clock>,
}

impl ScheduleCache {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        ScheduleCache {
            inner: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Whether the cached schedule for `sport` can be served without a refresh.
    #[allow(dead_code)]
    pub async fn is_fresh(&self, sport: Sport) -> bool {
        let now = self.clock.now();
        self.inner
            .read()
            .await
            .get(&sport)
            .is_some_and(|entry| entry.is_fresh(now))
    }

    /// Cached ids for `sport`, fresh or not. Empty when never populated.
    #[allow(dead_code)]
    pub async fn get(&self, sport: Sport) -> Vec<EventId> {
        self.inner
            .read()
            .await
            .get(&sport)
            .map(|entry| entry.ids.clone())
            .unwrap_or_default()
    }

    /// Freshness check and read under a single lock.
    pub async fn fresh_ids(&self, sport: Sport) -> Option<Vec<EventId>> {
        let now = self.clock.now();
        let inner = self.inner.read().await;
        inner
            .get(&sport)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.ids.clone())
    }

    /// Replace the entry for `sport` with the result of a successful refresh.
    pub async fn set(&self, sport: Sport, ids: Vec<EventId>, now: DateTime<Utc>) {
        let mut inner = self.inner.write().await;
        debug!("ScheduleCache: {} -> {} event ids", sport, ids.len());
        inner.insert(
            sport,
            CacheEntry {
                ids,
                refreshed_at: now,
            },
        );
    }
}
