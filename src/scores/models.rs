use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// League whose scoreboard we proxy. Each one is an independent cache partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Nba,
    Mlb,
}

impl Sport {
    pub const ALL: [Sport; 2] = [Sport::Nba, Sport::Mlb];

    /// Path segment used both upstream and in our own routes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Nba => "nba",
            Sport::Mlb => "mlb",
        }
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nba" => Ok(Sport::Nba),
            "mlb" => Ok(Sport::Mlb),
            other => Err(format!("unknown sport '{}'", other)),
        }
    }
}

/// Upstream event identifier. theScore sends integers, but nothing here
/// depends on that, so string ids are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Int(i64),
    Str(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Int(id) => write!(f, "{}", id),
            EventId::Str(id) => f.write_str(id),
        }
    }
}

/// Lifecycle state reported by the upstream `status` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GameStatus {
    PreGame,
    InProgress,
    Final,
    Postponed,
    /// Any other upstream state (half_time, delayed, cancelled, ...), kept verbatim.
    Other(String),
}

impl From<String> for GameStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pre_game" => GameStatus::PreGame,
            "in_progress" => GameStatus::InProgress,
            "final" => GameStatus::Final,
            "postponed" => GameStatus::Postponed,
            _ => GameStatus::Other(s),
        }
    }
}

impl From<GameStatus> for String {
    fn from(status: GameStatus) -> Self {
        match status {
            GameStatus::PreGame => "pre_game".to_string(),
            GameStatus::InProgress => "in_progress".to_string(),
            GameStatus::Final => "final".to_string(),
            GameStatus::Postponed => "postponed".to_string(),
            GameStatus::Other(s) => s,
        }
    }
}

/// One event record as served to clients: the upstream record plus the
/// derived `game_status` display string.
///
/// Fields the proxy does not interpret (teams, scores, venue, ...) are kept
/// in `extra` and serialized back at the top level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    pub status: GameStatus,
    #[serde(with = "game_date")]
    pub game_date: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub box_score: Option<serde_json::Value>,
    #[serde(default)]
    pub game_status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Game {
    /// Live progress text, e.g. "Q3 4:12" or "Final".
    pub fn progress_text(&self) -> Option<&str> {
        self.box_score
            .as_ref()?
            .pointer("/progress/string")?
            .as_str()
    }

    pub fn is_postponed(&self) -> bool {
        self.status == GameStatus::Postponed
    }

    pub fn is_final(&self) -> bool {
        self.status == GameStatus::Final
    }
}

/// theScore reports `game_date` as RFC 2822 ("Tue, 16 Apr 2019 23:05:00 -0000");
/// RFC 3339 is accepted as well and is what we emit.
pub mod game_date {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<FixedOffset>> {
        let raw = raw.trim();
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_rfc2822(raw))
            .ok()
    }

    pub fn serialize<S: Serializer>(date: &DateTime<FixedOffset>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&date.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<FixedOffset>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised game_date '{}'", raw)))
    }
}
