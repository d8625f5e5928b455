use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::catalog::Catalog;
use crate::playback::PlaybackStateStore;
use crate::response_log::{ResponseLog, ResponseRow};
use crate::stats;

#[cfg(feature = "slowdown")]
use super::http_layers::slowdown_request;
use super::http_layers::log_requests;
use super::state::*;
use super::submit::{parse_integer, SubmitBody, SubmitRequest};
use super::ServerConfig;

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

/// Participant-facing "now playing" payload; deliberately omits title and
/// url so the survey does not leak what is being rated.
#[derive(Serialize)]
struct CurrentSong {
    index: usize,
    display_index: usize,
    total: usize,
    song_id: Option<i64>,
}

/// Admin payload; same as `CurrentSong` plus the song details.
#[derive(Serialize)]
struct CurrentSongDetail {
    index: usize,
    display_index: usize,
    total: usize,
    song_id: Option<i64>,
    title: Option<String>,
    url: Option<String>,
}

#[derive(Serialize)]
struct SubmitReceipt {
    status: &'static str,
    rows_written: usize,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct SetSongBody {
    index: Value,
}

#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct ResponsesQuery {
    limit: Option<String>,
}

const DEFAULT_RESPONSES_LIMIT: i64 = 300;

fn storage_error(err: anyhow::Error) -> Response {
    error!("Storage failure: {:#}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, format!("{}", err)).into_response()
}

fn display_index(index: usize, total: usize) -> usize {
    if total > 0 {
        index + 1
    } else {
        0
    }
}

fn current_song(catalog: &Catalog, index: usize) -> CurrentSong {
    CurrentSong {
        index,
        display_index: display_index(index, catalog.len()),
        total: catalog.len(),
        song_id: catalog.get(index).map(|song| song.id),
    }
}

fn current_song_detail(catalog: &Catalog, index: usize) -> CurrentSongDetail {
    let song = catalog.get(index);
    CurrentSongDetail {
        index,
        display_index: display_index(index, catalog.len()),
        total: catalog.len(),
        song_id: song.map(|song| song.id),
        title: song.map(|song| song.title.clone()),
        url: song.map(|song| song.url.clone()),
    }
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        hash: env!("GIT_HASH").to_string(),
    };
    Json(stats)
}

async fn get_current_song(State(state): State<ServerState>) -> Response {
    match state.playback.current(state.catalog.len()) {
        Ok(index) => Json(current_song(&state.catalog, index)).into_response(),
        Err(err) => storage_error(err),
    }
}

async fn get_admin_current_song(State(state): State<ServerState>) -> Response {
    match state.playback.current(state.catalog.len()) {
        Ok(index) => Json(current_song_detail(&state.catalog, index)).into_response(),
        Err(err) => storage_error(err),
    }
}

async fn get_songs(State(catalog): State<GuardedCatalog>) -> Response {
    Json(catalog.songs()).into_response()
}

fn navigate(state: &ServerState, delta: i64) -> Response {
    match state.playback.advance(delta, state.catalog.len()) {
        Ok(index) => Json(current_song_detail(&state.catalog, index)).into_response(),
        Err(err) => storage_error(err),
    }
}

async fn post_next_song(State(state): State<ServerState>) -> Response {
    navigate(&state, 1)
}

async fn post_prev_song(State(state): State<ServerState>) -> Response {
    navigate(&state, -1)
}

async fn post_set_song(
    State(state): State<ServerState>,
    Json(body): Json<SetSongBody>,
) -> Response {
    // A missing or non-integer index means "jump to the first song".
    let requested = parse_integer(&body.index).unwrap_or(0);
    match state.playback.set(requested, state.catalog.len()) {
        Ok(index) => Json(current_song_detail(&state.catalog, index)).into_response(),
        Err(err) => storage_error(err),
    }
}

fn utc_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

fn build_rows(catalog: &Catalog, index: usize, request: &SubmitRequest) -> Vec<ResponseRow> {
    let song = catalog.get(index);
    let song_index = display_index(index, catalog.len()) as u32;
    let song_title = song.map(|song| song.title.clone()).unwrap_or_default();
    let timestamp = request
        .timestamp
        .clone()
        .unwrap_or_else(utc_timestamp);

    let row = |emotion: &str| ResponseRow {
        song_index,
        song_id: request.song_id,
        song_title: song_title.clone(),
        participant_id: request.participant_id.clone(),
        emotion: emotion.to_string(),
        timestamp: timestamp.clone(),
    };

    let mut rows = vec![row(&request.current_mood)];
    rows.extend(request.selected_emotions.iter().map(|emotion| row(emotion)));
    rows
}

async fn post_submit(State(state): State<ServerState>, Json(body): Json<SubmitBody>) -> Response {
    let request = match body.validate() {
        Ok(request) => request,
        Err(err) => return err.into_response(),
    };

    let total = state.catalog.len();
    let index = match state.playback.current(total) {
        Ok(index) => index,
        Err(err) => return storage_error(err),
    };

    let rows = build_rows(&state.catalog, index, &request);
    if let Err(err) = state.response_log.append(&rows) {
        return storage_error(err);
    }

    // Optimistic advance: a no-op if the admin already navigated away from
    // the song this submission was answered against.
    if request.advance_song && total > 0 {
        if let Err(err) = state.playback.advance_if_current(index, total) {
            return storage_error(err);
        }
    }

    Json(SubmitReceipt {
        status: "ok",
        rows_written: rows.len(),
    })
    .into_response()
}

async fn get_responses(
    State(response_log): State<GuardedResponseLog>,
    Query(query): Query<ResponsesQuery>,
) -> Response {
    let limit = query
        .limit
        .as_deref()
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_RESPONSES_LIMIT)
        .max(1) as usize;
    Json(response_log.read_tail(limit)).into_response()
}

async fn get_participants(State(response_log): State<GuardedResponseLog>) -> Response {
    Json(stats::distinct_participants(&response_log.read_all())).into_response()
}

async fn get_participant(
    State(response_log): State<GuardedResponseLog>,
    Path(participant_id): Path<String>,
) -> Response {
    Json(stats::participant_history(
        &response_log.read_all(),
        &participant_id,
    ))
    .into_response()
}

async fn get_summary(State(response_log): State<GuardedResponseLog>) -> Response {
    Json(stats::summarize(&response_log.read_all())).into_response()
}

pub fn make_app(
    config: ServerConfig,
    catalog: GuardedCatalog,
    playback: GuardedPlaybackStore,
    response_log: GuardedResponseLog,
) -> Router {
    let state = ServerState::new(config.clone(), catalog, playback, response_log);

    let participant_routes: Router = Router::new()
        .route("/current-song", get(get_current_song))
        .route("/submit", post(post_submit))
        .with_state(state.clone());

    let admin_routes: Router = Router::new()
        .route("/current-song", get(get_admin_current_song))
        .route("/songs", get(get_songs))
        .route("/next-song", post(post_next_song))
        .route("/prev-song", post(post_prev_song))
        .route("/set-song", post(post_set_song))
        .route("/responses", get(get_responses))
        .route("/participants", get(get_participants))
        .route("/participant/{participant_id}", get(get_participant))
        .route("/summary", get(get_summary))
        .with_state(state.clone());

    let home_router: Router = match config.frontend_dir_path {
        Some(frontend_path) => {
            let static_files_service =
                ServeDir::new(frontend_path).append_index_html_on_directories(true);
            Router::new().fallback_service(static_files_service)
        }
        None => Router::new()
            .route("/", get(home))
            .with_state(state.clone()),
    };

    let mut app: Router = home_router
        .nest("/api", participant_routes)
        .nest("/api/admin", admin_routes);

    #[cfg(feature = "slowdown")]
    {
        app = app.layer(middleware::from_fn(slowdown_request));
    }
    app = app.layer(middleware::from_fn_with_state(state, log_requests));

    app
}

pub async fn run_server(
    config: ServerConfig,
    catalog: Catalog,
    playback: PlaybackStateStore,
    response_log: ResponseLog,
) -> Result<()> {
    let port = config.port;
    let app = make_app(
        config,
        Arc::new(catalog),
        Arc::new(playback),
        Arc::new(response_log),
    );

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("Listening on {}", listener.local_addr()?);

    Ok(axum::serve(listener, app).await?)
}
