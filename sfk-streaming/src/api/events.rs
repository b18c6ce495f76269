//! Server-Sent Events (SSE) feed of finished streams
//!
//! Every stream that reaches a terminal state is published as a
//! `StreamFinished` event carrying the request and its report. The feed closes
//! when the server shuts down.

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

use super::server::AppContext;

/// SSE event name of a finished stream
pub const STREAM_FINISHED_EVENT: &str = "StreamFinished";

/// GET /api/v1/events - SSE event stream
pub async fn event_stream(
    State(ctx): State<AppContext>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("New SSE client connected");

    let rx = ctx.state.subscribe();
    let stream = BroadcastStream::new(rx)
        .filter_map(|result| async move {
            match result {
                Ok(finished) => match serde_json::to_string(&finished) {
                    Ok(json) => Some(Ok(Event::default()
                        .event(STREAM_FINISHED_EVENT)
                        .data(json))),
                    Err(e) => {
                        warn!("Failed to serialize event: {}", e);
                        None
                    }
                },
                Err(e) => {
                    // Lagged receiver: the missed events are gone
                    warn!("SSE stream error: {:?}", e);
                    None
                }
            }
        })
        .take_until(ctx.shutdown.clone().cancelled_owned());

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
