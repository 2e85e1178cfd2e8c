use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use crate::scores::{Game, GamesService, Sport};

#[derive(Clone)]
pub struct AppState {
    pub games: GamesService,
}

/// Build the Axum router: per sport an HTML scoreboard, a JSON feed and
/// the static assets the scoreboard page links to.
pub fn router(state: AppState, assets_dir: &Path) -> Router {
    let mut router = Router::new();

    for sport in Sport::ALL {
        let base = format!("/scores/{}", sport);
        router = router
            .route(
                &format!("{}/", base),
                get(move |State(state): State<Arc<AppState>>| scoreboard_handler(state, sport)),
            )
            .route(
                &format!("{}.json", base),
                get(move |State(state): State<Arc<AppState>>| games_json_handler(state, sport)),
            )
            .nest_service(&format!("{}/css", base), ServeDir::new(assets_dir.join("css")))
            .nest_service(&format!("{}/js", base), ServeDir::new(assets_dir.join("js")))
            .nest_service(
                &format!("{}/images", base),
                ServeDir::new(assets_dir.join("images").join(sport.as_str())),
            );
    }

    router
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// GET /scores/{sport}/
async fn scoreboard_handler(state: Arc<AppState>, sport: Sport) -> Response {
    match state.games.get_games(sport).await {
        Ok(games) => Html(render_scoreboard(sport, &games)).into_response(),
        Err(_) => error_response(),
    }
}

/// GET /scores/{sport}.json
async fn games_json_handler(state: Arc<AppState>, sport: Sport) -> Response {
    match state.games.get_games(sport).await {
        Ok(games) => (StatusCode::OK, Json(games)).into_response(),
        Err(_) => error_response(),
    }
}

/// Every failure gets the same page; the cause is already logged by the service.
fn error_response() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Html(ERROR_HTML)).into_response()
}

fn render_scoreboard(sport: Sport, games: &[Game]) -> String {
    let title = format!("{} Scores", sport.as_str().to_uppercase());
    let mut rows = String::new();
    for game in games {
        let class = if game.is_postponed() {
            "game postponed"
        } else if game.is_final() {
            "game final"
        } else {
            "game"
        };
        rows.push_str(&format!(
            r#"    <li class="{}">
      <span class="team away">{}</span>
      <span class="score">{} – {}</span>
      <span class="team home">{}</span>
      <span class="status">{}</span>
    </li>
"#,
            class,
            escape(&team_name(game, "away_team")),
            escape(&team_score(game, "away")),
            escape(&team_score(game, "home")),
            escape(&team_name(game, "home_team")),
            escape(&game.game_status),
        ));
    }
    if rows.is_empty() {
        rows.push_str("    <li class=\"empty\">No games scheduled</li>\n");
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<link rel="stylesheet" href="css/scoreboard.css">
</head>
<body class="{sport}">
<header><h1>{title}</h1></header>
<main>
  <ul class="games">
{rows}  </ul>
</main>
<script src="js/scoreboard.js"></script>
</body>
</html>
"#,
        title = title,
        sport = sport,
        rows = rows,
    )
}

fn team_name(game: &Game, side: &str) -> String {
    let team = match game.extra.get(side) {
        Some(team) => team,
        None => return String::new(),
    };
    ["name", "full_name", "abbreviation"]
        .iter()
        .find_map(|key| team.get(*key).and_then(|v| v.as_str()))
        .unwrap_or_default()
        .to_string()
}

fn team_score(game: &Game, side: &str) -> String {
    game.box_score
        .as_ref()
        .and_then(|b| b.pointer(&format!("/score/{}/score", side)))
        .map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const ERROR_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<title>Scores unavailable</title>
</head>
<body>
<h1>Scores are unavailable right now</h1>
<p>Please try again in a few minutes.</p>
</body>
</html>
"#;
