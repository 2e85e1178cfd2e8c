use thiserror::Error;

use super::models::Sport;

/// Failure reaching the upstream API.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Malformed or incomplete events payload. Any one bad record fails the batch.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("events payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("event record {index} is malformed: {reason}")]
    MalformedRecord { index: usize, reason: String },
}

/// Failure producing the event id list for a sport.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("schedule payload is malformed: {0}")]
    Schedule(#[from] serde_json::Error),
}

/// The single error surfaced by the games service. Callers answer it with a
/// generic failure and do not need to look at the cause.
#[derive(Debug, Error)]
#[error("could not load {sport} games: {cause}")]
pub struct ServiceError {
    pub sport: Sport,
    #[source]
    pub cause: ServiceErrorCause,
}

#[derive(Debug, Error)]
pub enum ServiceErrorCause {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Events(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl ServiceError {
    pub fn new(sport: Sport, cause: impl Into<ServiceErrorCause>) -> Self {
        ServiceError {
            sport,
            cause: cause.into(),
        }
    }
}
