//! Playback tracker (sfk-plays) - Main entry point
//!
//! Keeps an in-memory history of the playbacks reported by the streaming
//! server and serves it back per user.

use anyhow::{Context, Result};
use clap::Parser;
use sfk_plays::{build_router, AppState, PlaybackStore};
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for sfk-plays
#[derive(Parser, Debug)]
#[command(name = "sfk-plays")]
#[command(about = "Playback tracker for SFK")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5002", env = "SFK_PLAYS_PORT")]
    port: u16,

    /// Start with a few demo playbacks
    #[arg(long, env = "SFK_PLAYS_SAMPLE_DATA")]
    sample_data: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sfk_plays=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SFK playback tracker v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let store = if args.sample_data {
        let store = PlaybackStore::with_sample_data();
        info!("Store initialized with {} sample playbacks", store.len());
        store
    } else {
        PlaybackStore::new()
    };

    let app = build_router(AppState::new(store));

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("sfk-plays listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
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
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received terminate signal, shutting down"),
    }
}
