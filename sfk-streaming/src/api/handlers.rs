//! HTTP request handlers
//!
//! Implements the streaming endpoint and health check.

use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sfk_common::wire::STREAM_CONTENT_TYPE;
use std::sync::Arc;
use tracing::debug;

use super::server::AppContext;
use super::sink::channel_sink;
use crate::dispatcher::StreamRequest;
use crate::state::StreamCounters;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
    audio_dir: String,
    streams: StreamCounters,
}

// ============================================================================
// Health Endpoint
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        module: "sfk-streaming".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        audio_dir: ctx.dispatcher.source().root().display().to_string(),
        streams: ctx.state.counters(),
    })
}

// ============================================================================
// Streaming Endpoint
// ============================================================================

/// POST /api/v1/stream - Stream a song as framed chunks
///
/// **Request:** `{"song_name": "Flaca.mp3", "user_id": 7}`
///
/// **Response:** always 200 with a framed body; the terminal status travels in
/// the trailer frame (see `sfk_common::wire`). The pump runs in its own task so
/// the body can start flowing immediately.
pub async fn stream_audio(
    State(ctx): State<AppContext>,
    Json(request): Json<StreamRequest>,
) -> Response {
    debug!(song = %request.song_name, "Stream endpoint hit");

    let (mut sink, body) = channel_sink(ctx.shutdown.clone());
    let dispatcher = Arc::clone(&ctx.dispatcher);
    let state = Arc::clone(&ctx.state);

    state.stream_started();
    tokio::spawn(async move {
        let report = dispatcher.dispatch(request.clone(), &mut sink).await;
        sink.finish(report.outcome).await;
        state.stream_finished(request, report);
    });

    (
        [(header::CONTENT_TYPE, STREAM_CONTENT_TYPE)],
        Body::from_stream(body),
    )
        .into_response()
}
