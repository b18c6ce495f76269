//! HTTP server setup and routing
//!
//! Sets up the Axum router for the streaming endpoint and runs it until a
//! shutdown signal arrives.

use crate::dispatcher::StreamDispatcher;
use crate::error::{Error, Result};
use crate::state::SharedState;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub dispatcher: Arc<StreamDispatcher>,
    pub state: Arc<SharedState>,
    /// Fired when the server shuts down; interrupts running streams
    pub shutdown: CancellationToken,
}

impl AppContext {
    pub fn new(dispatcher: StreamDispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            state: Arc::new(SharedState::new()),
            shutdown: CancellationToken::new(),
        }
    }
}

/// Build the API router
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(super::handlers::health))
        .nest(
            "/api/v1",
            Router::new()
                .route("/stream", post(super::handlers::stream_audio))
                .route("/events", get(super::events::event_stream)),
        )
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Run the HTTP API server until Ctrl+C / SIGTERM
pub async fn run(port: u16, ctx: AppContext) -> Result<()> {
    let shutdown = ctx.shutdown.clone();
    let app = create_router(ctx);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Http(format!("Failed to bind to {}: {}", addr, e)))?;
    info!("Streaming server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Running streams end with an UNAVAILABLE trailer, event feeds close
            shutdown.cancel();
        })
        .await
        .map_err(|e| Error::Http(format!("Server error: {}", e)))?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
