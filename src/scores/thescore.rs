use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::error::TransportError;
use super::models::{EventId, Sport};
use super::provider::UpstreamClient;

pub const DEFAULT_BASE_URL: &str = "http://api.thescore.com";

/// Schedules are requested relative to US Eastern standard time.
const SCHEDULE_UTC_OFFSET: i32 = -18000;

/// Upstream client backed by the public theScore API.
#[derive(Clone)]
pub struct TheScore {
    http: Client,
    /// Base URL for overriding in tests
    base_url: String,
}

impl TheScore {
    /// `timeout` is left to reqwest's default when `None`.
    pub fn new(base_url: Option<&str>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;
        Ok(TheScore {
            http,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn schedule_url(&self, sport: Sport) -> String {
        format!(
            "{}/{}/schedule?utc_offset={}",
            self.base_url, sport, SCHEDULE_UTC_OFFSET
        )
    }

    fn events_url(&self, sport: Sport, ids: &[EventId]) -> String {
        let joined = ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            "{}/{}/events?id.in={}",
            self.base_url,
            sport,
            urlencoding::encode(&joined)
        )
    }

    async fn get_text(&self, url: String) -> Result<String, TransportError> {
        debug!("GET {}", url);
        let resp = match self.http.get(&url).send().await {
            Ok(resp) => resp,
            Err(source) => return Err(TransportError::Request { url, source }),
        };

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status { url, status });
        }

        resp.text()
            .await
            .map_err(|source| TransportError::Request { url, source })
    }
}

#[async_trait]
impl UpstreamClient for TheScore {
    fn name(&self) -> &str {
        "theScore"
    }

    async fn fetch_schedule(&self, sport: Sport) -> Result<String, TransportError> {
        self.get_text(self.schedule_url(sport)).await
    }

    async fn fetch_events(&self, sport: Sport, ids: &[EventId]) -> Result<String, TransportError> {
        self.get_text(self.events_url(sport, ids)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_events_url_encodes_commas() {
        let client = TheScore::new(Some("http://example.test/"), None).unwrap();
        let ids = vec![EventId::Int(1), EventId::Int(22), EventId::Str("x y".into())];
        assert_eq!(
            client.events_url(Sport::Mlb, &ids),
            "http://example.test/mlb/events?id.in=1%2C22%2Cx%20y"
        );
    }

    #[test]
    fn test_schedule_url() {
        let client = TheScore::new(None, None).unwrap();
        assert_eq!(
            client.schedule_url(Sport::Nba),
            "http://api.thescore.com/nba/schedule?utc_offset=-18000"
        );
    }

    #[tokio::test]
    async fn test_fetch_schedule_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/nba/schedule"))
            .and(query_param("utc_offset", "-18000"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"current_group":{"event_ids":[1,2]}}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = TheScore::new(Some(server.uri().as_str()), None).unwrap();
        let body = client.fetch_schedule(Sport::Nba).await.unwrap();
        assert_eq!(body, r#"{"current_group":{"event_ids":[1,2]}}"#);
    }

    #[tokio::test]
    async fn test_fetch_events_sends_id_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/mlb/events"))
            .and(query_param("id.in", "10,11"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(1)
            .mount(&server)
            .await;

        let client = TheScore::new(Some(server.uri().as_str()), None).unwrap();
        let body = client
            .fetch_events(Sport::Mlb, &[EventId::Int(10), EventId::Int(11)])
            .await
            .unwrap();
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_error_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = TheScore::new(Some(server.uri().as_str()), None).unwrap();
        let err = client.fetch_schedule(Sport::Nba).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::Status { status, .. } if status.as_u16() == 503
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        // Port 9 (discard) is not expected to have an HTTP listener.
        let client = TheScore::new(Some("http://127.0.0.1:9"), None).unwrap();
        let err = client.fetch_schedule(Sport::Nba).await.unwrap_err();
        assert!(matches!(err, TransportError::Request { .. }));
    }
}
