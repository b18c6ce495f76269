//! sfk-plays library - Playback tracker
//!
//! Records the playbacks reported by the streaming server and answers
//! per-user queries for trend computation.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod store;

pub use store::PlaybackStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Playback history
    pub store: Arc<PlaybackStore>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: PlaybackStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::plays_routes())
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
