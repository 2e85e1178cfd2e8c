//! Fetch, cache and transform pipeline behind the scoreboard routes.
//!
//! ```text
//!  GamesService ──▶ GameFetcher ──▶ ScheduleCache (fresh?)
//!       │                 └──stale──▶ UpstreamClient::fetch_schedule
//!       ├──▶ UpstreamClient::fetch_events(ids)
//!       └──▶ transform (game_status + display order)
//! ```

pub mod cache;
pub mod clock;
pub mod error;
pub mod fetcher;
pub mod models;
pub mod provider;
pub mod service;
pub mod thescore;
pub mod transform;

pub use cache::ScheduleCache;
pub use clock::SystemClock;
pub use fetcher::GameFetcher;
pub use models::{Game, Sport};
pub use provider::UpstreamClient;
pub use service::GamesService;
pub use thescore::TheScore;
