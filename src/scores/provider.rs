use async_trait::async_trait;

use super::error::TransportError;
use super::models::{EventId, Sport};

/// Source of raw schedule and event payloads.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Raw schedule body for `sport`, listing the current group's event ids.
    async fn fetch_schedule(&self, sport: Sport) -> Result<String, TransportError>;

    /// Raw body holding the full event records for `ids`.
    async fn fetch_events(&self, sport: Sport, ids: &[EventId]) -> Result<String, TransportError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
