use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod config;
mod scores;
mod web;

use config::Config;
use scores::{GameFetcher, GamesService, ScheduleCache, SystemClock, TheScore, UpstreamClient};
use web::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let upstream: Arc<dyn UpstreamClient> = Arc::new(TheScore::new(
        Some(config.upstream_url.as_str()),
        config.upstream_timeout(),
    )?);
    info!("Upstream: {} at {}", upstream.name(), config.upstream_url);

    // One schedule cache for the lifetime of the process, shared by all requests.
    let cache = ScheduleCache::new(Arc::new(SystemClock));
    let fetcher = GameFetcher::new(upstream.clone(), cache);
    let games = GamesService::new(fetcher, upstream);

    let app = web::router(AppState { games }, &config.assets_dir);
    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Scoreboard listening on http://{}/scores/{{nba,mlb}}/", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
