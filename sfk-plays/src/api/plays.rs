//! Playback record and query endpoints
//!
//! - `POST /reproducciones` stores `{idUsuario, titulo}` and answers 201
//! - `GET /reproducciones[?idUsuario=N]` lists all records or one user's

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sfk_common::PlaybackEvent;
use tracing::{info, warn};

use crate::AppState;

/// Query parameters for GET /reproducciones
#[derive(Debug, Deserialize)]
pub struct PlaysQuery {
    /// Kept as text so a malformed id gets a plain 400 with our own message
    #[serde(rename = "idUsuario")]
    pub user_id: Option<String>,
}

/// POST /reproducciones
///
/// Malformed bodies are rejected by the JSON extractor before reaching here.
pub async fn record_play(
    State(state): State<AppState>,
    Json(event): Json<PlaybackEvent>,
) -> Response {
    let record = state.store.record(event.user_id, &event.title);
    info!(
        user_id = record.user_id,
        title = %record.title,
        played_at = %record.played_at,
        "Playback recorded"
    );

    (StatusCode::CREATED, "Playback recorded").into_response()
}

/// GET /reproducciones
pub async fn list_plays(
    State(state): State<AppState>,
    Query(query): Query<PlaysQuery>,
) -> Response {
    let Some(raw) = query.user_id.filter(|s| !s.is_empty()) else {
        return Json(state.store.all()).into_response();
    };

    let user_id: i64 = match raw.parse() {
        Ok(id) => id,
        Err(_) => {
            warn!("Rejected playback query with idUsuario={:?}", raw);
            return (
                StatusCode::BAD_REQUEST,
                "Parameter 'idUsuario' must be an integer",
            )
                .into_response();
        }
    };

    // Negative or oversized ids cannot belong to any stored record
    let records = match u32::try_from(user_id) {
        Ok(id) => state.store.for_user(id),
        Err(_) => Vec::new(),
    };
    info!(user_id, found = records.len(), "Playback query");

    Json(records).into_response()
}

/// Build playback routes
pub fn plays_routes() -> Router<AppState> {
    Router::new().route("/reproducciones", get(list_plays).post(record_play))
}
