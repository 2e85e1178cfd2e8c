use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;

use super::error::ParseError;
use super::models::{Game, GameStatus};

/// Start times are shown in US Central time.
pub const DISPLAY_TZ: Tz = chrono_tz::America::Chicago;

/// `h:mm A`: 12-hour clock, no leading zero on the hour.
const DISPLAY_TIME_FORMAT: &str = "%-I:%M %p";

/// Parse an upstream events payload, derive each game's display status and
/// return the games in display order.
///
/// A single malformed record fails the whole batch.
pub fn transform(body: &str) -> Result<Vec<Game>, ParseError> {
    let records: Vec<serde_json::Value> = serde_json::from_str(body)?;

    let mut games = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| parse_game(index, record))
        .collect::<Result<Vec<_>, _>>()?;

    sort_for_display(&mut games);
    Ok(games)
}

fn parse_game(index: usize, record: serde_json::Value) -> Result<Game, ParseError> {
    let malformed = |reason: String| ParseError::MalformedRecord { index, reason };

    for field in ["status", "game_date"] {
        if record.get(field).map_or(true, |v| v.is_null()) {
            return Err(malformed(format!("missing {}", field)));
        }
    }

    let mut game: Game = serde_json::from_value(record).map_err(|e| malformed(e.to_string()))?;
    game.game_status = match game.status {
        GameStatus::PreGame => format_start_time(&game.game_date),
        _ => game
            .progress_text()
            .ok_or_else(|| malformed("missing box_score.progress.string".to_string()))?
            .to_string(),
    };
    Ok(game)
}

/// Format a start time as shown on the scoreboard, e.g. `7:05 PM`.
pub fn format_start_time(date: &DateTime<FixedOffset>) -> String {
    date.with_timezone(&DISPLAY_TZ)
        .format(DISPLAY_TIME_FORMAT)
        .to_string()
}

/// Upcoming and live games first, then finals, then postponed games; each
/// group by start time. The sort is stable so simultaneous starts keep
/// upstream order.
pub fn sort_for_display(games: &mut [Game]) {
    games.sort_by(|a, b| {
        display_bucket(a)
            .cmp(&display_bucket(b))
            .then_with(|| a.game_date.cmp(&b.game_date))
    });
}

fn display_bucket(game: &Game) -> u8 {
    if game.is_postponed() {
        2
    } else if game.is_final() {
        1
    } else {
        0
    }
}
