use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::cache::ScheduleCache;
use super::error::FetchError;
use super::models::{EventId, Sport};
use super::provider::UpstreamClient;

#[derive(Debug, Deserialize)]
struct Schedule {
    current_group: CurrentGroup,
}

#[derive(Debug, Deserialize)]
struct CurrentGroup {
    event_ids: Vec<EventId>,
}

/// Resolves the event ids to show for a sport, going upstream only when the
/// cached schedule is stale.
#[derive(Clone)]
pub struct GameFetcher {
    upstream: Arc<dyn UpstreamClient>,
    cache: ScheduleCache,
}

impl GameFetcher {
    pub fn new(upstream: Arc<dyn UpstreamClient>, cache: ScheduleCache) -> Self {
        GameFetcher { upstream, cache }
    }

    pub async fn get_event_ids(&self, sport: Sport) -> Result<Vec<EventId>, FetchError> {
        if let Some(ids) = self.cache.fresh_ids(sport).await {
            debug!("Schedule cache hit for {} ({} events)", sport, ids.len());
            return Ok(ids);
        }

        let body = self.upstream.fetch_schedule(sport).await.map_err(|e| {
            warn!("{} schedule fetch for {} failed: {}", self.upstream.name(), sport, e);
            e
        })?;
        let ids = parse_schedule(&body)?;

        if ids.is_empty() {
            warn!("{} schedule for {} has no events", self.upstream.name(), sport);
        } else {
            info!("Refreshed {} schedule: {} events", sport, ids.len());
        }
        self.cache.set(sport, ids.clone(), self.cache.now()).await;
        Ok(ids)
    }
}

fn parse_schedule(body: &str) -> Result<Vec<EventId>, FetchError> {
    let schedule: Schedule = serde_json::from_str(body)?;
    Ok(schedule.current_group.event_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scores::cache::CACHE_INTERVAL_MS;
    use crate::scores::clock::ManualClock;
    use crate::scores::provider::fake::FakeUpstream;
    use chrono::{TimeZone, Utc};

    fn setup() -> (Arc<FakeUpstream>, Arc<ManualClock>, ScheduleCache, GameFetcher) {
        let upstream = Arc::new(FakeUpstream::new());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 4, 16, 17, 0, 0).unwrap(),
        ));
        let cache = ScheduleCache::new(clock.clone());
        let fetcher = GameFetcher::new(upstream.clone(), cache.clone());
        (upstream, clock, cache, fetcher)
    }

    fn schedule(ids: &str) -> Result<String, u16> {
        Ok(format!(r#"{{"current_group":{{"id":"2024-04-16","event_ids":{}}}}}"#, ids))
    }

    #[tokio::test]
    async fn test_miss_fetches_and_caches() {
        let (upstream, _, cache, fetcher) = setup();
        upstream.push_schedule(schedule("[1, 2, 3]"));

        let ids = fetcher.get_event_ids(Sport::Nba).await.unwrap();
        assert_eq!(ids, vec![EventId::Int(1), EventId::Int(2), EventId::Int(3)]);
        assert!(cache.is_fresh(Sport::Nba).await);

        // Second call is served from cache.
        let again = fetcher.get_event_ids(Sport::Nba).await.unwrap();
        assert_eq!(again, ids);
        assert_eq!(upstream.schedule_calls(), 1);
    }

    #[tokio::test]
    async fn test_refetches_after_interval() {
        let (upstream, clock, _, fetcher) = setup();
        upstream.push_schedule(schedule("[1]")).push_schedule(schedule("[4, 5]"));

        fetcher.get_event_ids(Sport::Mlb).await.unwrap();
        clock.advance_ms(CACHE_INTERVAL_MS);
        let ids = fetcher.get_event_ids(Sport::Mlb).await.unwrap();

        assert_eq!(ids, vec![EventId::Int(4), EventId::Int(5)]);
        assert_eq!(upstream.schedule_calls(), 2);
    }

    #[tokio::test]
    async fn test_empty_schedule_is_retried_every_time() {
        let (upstream, _, _, fetcher) = setup();
        upstream.push_schedule(schedule("[]"));

        assert!(fetcher.get_event_ids(Sport::Nba).await.unwrap().is_empty());
        assert!(fetcher.get_event_ids(Sport::Nba).await.unwrap().is_empty());
        assert_eq!(upstream.schedule_calls(), 2);
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_cache_untouched() {
        let (upstream, clock, cache, fetcher) = setup();
        upstream.push_schedule(schedule("[1]")).push_schedule(Err(500));

        fetcher.get_event_ids(Sport::Nba).await.unwrap();
        clock.advance_ms(CACHE_INTERVAL_MS);

        let err = fetcher.get_event_ids(Sport::Nba).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
        assert_eq!(cache.get(Sport::Nba).await, vec![EventId::Int(1)]);
        // No negative caching: the next request goes upstream again.
        assert!(fetcher.get_event_ids(Sport::Nba).await.is_err());
        assert_eq!(upstream.schedule_calls(), 3);
    }

    #[tokio::test]
    async fn test_malformed_schedule_is_fetch_error() {
        let (upstream, _, cache, fetcher) = setup();
        upstream
            .push_schedule(Ok("<html>oops</html>".into()))
            .push_schedule(Ok(r#"{"current_group":{}}"#.into()));

        let err = fetcher.get_event_ids(Sport::Nba).await.unwrap_err();
        assert!(matches!(err, FetchError::Schedule(_)));
        let err = fetcher.get_event_ids(Sport::Nba).await.unwrap_err();
        assert!(matches!(err, FetchError::Schedule(_)));
        assert!(!cache.is_fresh(Sport::Nba).await);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_fresh_entry_for_other_sport() {
        let (upstream, _, cache, fetcher) = setup();
        upstream.push_schedule(schedule("[7]")).push_schedule(Err(503));
        fetcher.get_event_ids(Sport::Nba).await.unwrap();

        assert!(fetcher.get_event_ids(Sport::Mlb).await.is_err());
        assert!(cache.is_fresh(Sport::Nba).await);
        assert_eq!(fetcher.get_event_ids(Sport::Nba).await.unwrap(), vec![EventId::Int(7)]);
    }
}
