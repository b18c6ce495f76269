//! Streaming server (sfk-streaming) - Main entry point
//!
//! Serves songs from the shared audio folder as framed chunk streams and
//! reports each playback to the tracker service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use sfk_common::config::{ensure_audio_dir, resolve_audio_dir, resolve_tracker_url, TomlConfig};
use sfk_streaming::api::{self, AppContext};
use sfk_streaming::sidecar::{HttpPlaybackReporter, NotificationSidecar};
use sfk_streaming::source::ChunkedFileSource;
use sfk_streaming::StreamDispatcher;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for sfk-streaming
#[derive(Parser, Debug)]
#[command(name = "sfk-streaming")]
#[command(about = "Audio streaming server for SFK")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "50051", env = "SFK_STREAMING_PORT")]
    port: u16,

    /// Folder holding the .mp3 files (also SFK_AUDIO_DIR or `audio_dir` in the config file)
    #[arg(short, long)]
    audio_dir: Option<PathBuf>,

    /// Playback tracker endpoint
    #[arg(short, long, env = "SFK_TRACKER_URL")]
    tracker_url: Option<String>,

    /// TOML config file (default: ~/.config/sfk/config.toml)
    #[arg(short, long, env = "SFK_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sfk_streaming=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SFK streaming server v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = TomlConfig::load_or_default(args.config.as_deref());

    // The audio folder is a hard precondition
    let audio_dir = resolve_audio_dir(args.audio_dir.as_deref(), &config);
    info!("Checking audio folder: {}", audio_dir.display());
    let audio_dir = match ensure_audio_dir(&audio_dir) {
        Ok(dir) => dir,
        Err(e) => {
            error!("Audio folder unavailable, put the .mp3 files there first: {}", e);
            return Err(e).context("Audio folder check failed");
        }
    };
    info!("✓ Audio folder found: {}", audio_dir.display());

    let tracker_url = resolve_tracker_url(args.tracker_url.as_deref(), &config);
    info!("Playback tracker: {}", tracker_url);

    let reporter = HttpPlaybackReporter::new(tracker_url)
        .context("Failed to build tracker client")?;
    let dispatcher = StreamDispatcher::new(
        ChunkedFileSource::new(audio_dir),
        NotificationSidecar::new(Arc::new(reporter)),
    );

    api::run(args.port, AppContext::new(dispatcher))
        .await
        .context("Server error")?;

    Ok(())
}
