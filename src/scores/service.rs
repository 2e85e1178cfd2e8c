use std::sync::Arc;
use tracing::{debug, error};

use super::error::ServiceError;
use super::fetcher::GameFetcher;
use super::models::{Game, Sport};
use super::provider::UpstreamClient;
use super::transform::transform;

/// Entry point for the HTTP layer: the current, display-ordered games for a sport.
#[derive(Clone)]
pub struct GamesService {
    fetcher: GameFetcher,
    upstream: Arc<dyn UpstreamClient>,
}

impl GamesService {
    pub fn new(fetcher: GameFetcher, upstream: Arc<dyn UpstreamClient>) -> Self {
        GamesService { fetcher, upstream }
    }

    pub async fn get_games(&self, sport: Sport) -> Result<Vec<Game>, ServiceError> {
        self.load(sport).await.map_err(|e| {
            error!("{}", e);
            e
        })
    }

    async fn load(&self, sport: Sport) -> Result<Vec<Game>, ServiceError> {
        let ids = self
            .fetcher
            .get_event_ids(sport)
            .await
            .map_err(|e| ServiceError::new(sport, e))?;

        let body = self
            .upstream
            .fetch_events(sport, &ids)
            .await
            .map_err(|e| ServiceError::new(sport, e))?;

        let games = transform(&body).map_err(|e| ServiceError::new(sport, e))?;
        debug!("Serving {} {} games", games.len(), sport);
        Ok(games)
    }
}
