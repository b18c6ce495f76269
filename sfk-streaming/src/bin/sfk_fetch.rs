//! sfk-fetch - download a song through the streaming server
//!
//! Usage: `sfk-fetch "Tren al Sur.mp3" --user-id 7 --output tren.mp3`

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use sfk_streaming::client::StreamClient;
use sfk_streaming::StreamRequest;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sfk-fetch")]
#[command(about = "Fetch a song from the SFK streaming server")]
#[command(version)]
struct Args {
    /// Song file name (".mp3" optional)
    song: String,

    /// User the playback is recorded for
    #[arg(short, long, default_value = "0")]
    user_id: u32,

    /// Streaming server base URL
    #[arg(short, long, default_value = "http://localhost:50051", env = "SFK_STREAMING_URL")]
    server: String,

    /// Output file (default: the song's file name)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let request = StreamRequest::new(args.song.clone(), args.user_id);
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.mp3", request.title())));

    let client = StreamClient::new(&args.server)?;

    info!("Requesting '{}' from {}", args.song, args.server);
    let summary = client
        .download(&request, &output)
        .await
        .with_context(|| format!("Stream to {} failed", output.display()))?;

    if !summary.status.is_ok() {
        bail!("Server ended the stream with {}", summary.status);
    }

    info!(
        "Saved {} bytes in {} chunks to {}",
        summary.bytes,
        summary.chunks,
        output.display()
    );
    Ok(())
}
