//! Stream dispatcher
//!
//! Drives one stream request from receipt to a terminal outcome:
//!
//! ```text
//! Init -> Notifying & Streaming -> Completed | Cancelled | Failed
//! ```
//!
//! The playback notification is launched first as a detached task. The chunk
//! pump then reads one chunk, hands it to the sink, and only reads the next one
//! once the sink accepted it. Every terminal state is decided by the read/send
//! path alone.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sfk_common::strip_audio_extension;
use tokio::io::AsyncRead;
use tracing::{debug, error, info, warn};

use crate::classify::{classify_send_failure, classify_source_error, StreamOutcome, TransportFailure};
use crate::sidecar::NotificationSidecar;
use crate::source::{Chunk, ChunkedFile, ChunkedFileSource};

/// Incoming stream request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRequest {
    /// Song file name, with or without the `.mp3` suffix
    pub song_name: String,
    pub user_id: u32,
}

impl StreamRequest {
    pub fn new(song_name: impl Into<String>, user_id: u32) -> Self {
        Self {
            song_name: song_name.into(),
            user_id,
        }
    }

    /// Title reported to the tracker
    pub fn title(&self) -> &str {
        strip_audio_extension(&self.song_name)
    }
}

/// Outbound channel towards the client
#[async_trait]
pub trait ChunkSink: Send {
    /// Deliver one chunk; resolves once the transport accepted it
    async fn send(&mut self, chunk: Chunk) -> Result<(), TransportFailure>;
}

/// Summary of a finished stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StreamReport {
    pub outcome: StreamOutcome,
    pub chunks_sent: u64,
    pub bytes_sent: u64,
}

impl StreamReport {
    fn new(outcome: StreamOutcome) -> Self {
        Self {
            outcome,
            chunks_sent: 0,
            bytes_sent: 0,
        }
    }
}

/// Stream request orchestrator
#[derive(Clone)]
pub struct StreamDispatcher {
    source: ChunkedFileSource,
    sidecar: NotificationSidecar,
}

impl StreamDispatcher {
    pub fn new(source: ChunkedFileSource, sidecar: NotificationSidecar) -> Self {
        Self { source, sidecar }
    }

    pub fn source(&self) -> &ChunkedFileSource {
        &self.source
    }

    /// Serve one request into `sink`
    pub async fn dispatch<S>(&self, request: StreamRequest, sink: &mut S) -> StreamReport
    where
        S: ChunkSink + ?Sized,
    {
        info!(song = %request.song_name, user_id = request.user_id, "Stream requested");

        self.sidecar.notify(request.user_id, request.title().to_string());

        let file = match self.source.open(&request.song_name).await {
            Ok(file) => file,
            Err(e) => {
                let outcome = classify_source_error(&e);
                warn!(song = %request.song_name, "Cannot stream: {}", e);
                return StreamReport::new(outcome);
            }
        };

        info!(
            file = %file.label(),
            bytes = file.length().unwrap_or_default(),
            "Streaming started"
        );
        let report = pump(file, sink).await;

        match report.outcome {
            StreamOutcome::Completed => info!(
                song = %request.song_name,
                chunks = report.chunks_sent,
                bytes = report.bytes_sent,
                "Stream completed"
            ),
            StreamOutcome::CancelledByClient => info!(
                song = %request.song_name,
                chunks = report.chunks_sent,
                "Client cancelled the stream"
            ),
            outcome => error!(
                song = %request.song_name,
                chunks = report.chunks_sent,
                "Stream failed: {}",
                outcome
            ),
        }

        report
    }
}

/// Move chunks from `file` to `sink` in file order until a terminal state
///
/// Takes the file by value: the handle is released before this returns, on
/// every path, and nothing is read after a failed send.
pub async fn pump<R, S>(mut file: ChunkedFile<R>, sink: &mut S) -> StreamReport
where
    R: AsyncRead + Unpin + Send,
    S: ChunkSink + ?Sized,
{
    let mut report = StreamReport::new(StreamOutcome::Completed);

    loop {
        let chunk = match file.next_chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => return report,
            Err(e) => {
                error!("{}", e);
                report.outcome = classify_source_error(&e);
                return report;
            }
        };

        let size = chunk.len() as u64;
        if let Err(failure) = sink.send(chunk).await {
            report.outcome = classify_send_failure(&failure);
            if report.outcome == StreamOutcome::SendFailure {
                error!("Chunk send failed: {}", failure);
            } else {
                debug!("Send stopped: {}", failure);
            }
            return report;
        }

        report.chunks_sent += 1;
        report.bytes_sent += size;
        debug!(
            "Chunk #{} ({} bytes) sent from {}",
            report.chunks_sent,
            size,
            file.label()
        );
    }
}
