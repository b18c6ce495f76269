//! Recording sinks, reporters and a fake tracker

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use sfk_common::PlaybackEvent;
use sfk_streaming::classify::{TransportCode, TransportFailure};
use sfk_streaming::dispatcher::ChunkSink;
use sfk_streaming::sidecar::{NotifyError, PlaybackReporter};
use sfk_streaming::source::Chunk;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::sync::mpsc;

/// Sink that keeps every chunk
#[derive(Default)]
pub struct VecSink {
    pub chunks: Vec<Chunk>,
}

impl VecSink {
    pub fn sizes(&self) -> Vec<usize> {
        self.chunks.iter().map(Chunk::len).collect()
    }

    pub fn joined(&self) -> Vec<u8> {
        self.chunks.iter().flat_map(|c| c.payload.to_vec()).collect()
    }
}

#[async_trait]
impl ChunkSink for VecSink {
    async fn send(&mut self, chunk: Chunk) -> Result<(), TransportFailure> {
        self.chunks.push(chunk);
        Ok(())
    }
}

/// Sink accepting `accept` chunks, then failing every send with `code`
pub struct CancellingSink {
    pub accept: usize,
    pub code: TransportCode,
    pub accepted: Vec<Chunk>,
    pub attempts: usize,
}

impl CancellingSink {
    pub fn new(accept: usize, code: TransportCode) -> Self {
        Self {
            accept,
            code,
            accepted: Vec::new(),
            attempts: 0,
        }
    }
}

#[async_trait]
impl ChunkSink for CancellingSink {
    async fn send(&mut self, chunk: Chunk) -> Result<(), TransportFailure> {
        self.attempts += 1;
        if self.accepted.len() >= self.accept {
            return Err(TransportFailure::new(self.code, "client hung up"));
        }
        self.accepted.push(chunk);
        Ok(())
    }
}

/// Reporter forwarding every event to a channel; optionally failing afterwards
pub struct RecordingReporter {
    tx: mpsc::UnboundedSender<PlaybackEvent>,
    fail: bool,
}

impl RecordingReporter {
    pub fn new(fail: bool) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, fail }, rx)
    }
}

#[async_trait]
impl PlaybackReporter for RecordingReporter {
    async fn report(&self, event: &PlaybackEvent) -> Result<(), NotifyError> {
        let _ = self.tx.send(event.clone());
        if self.fail {
            Err(NotifyError::Network("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Reporter that never finishes
pub struct StalledReporter;

#[async_trait]
impl PlaybackReporter for StalledReporter {
    async fn report(&self, _event: &PlaybackEvent) -> Result<(), NotifyError> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Loopback tracker recording POSTed events
pub struct FakeTracker {
    pub addr: SocketAddr,
    events: mpsc::UnboundedReceiver<PlaybackEvent>,
}

#[derive(Clone)]
struct TrackerState {
    tx: mpsc::UnboundedSender<PlaybackEvent>,
    reply: StatusCode,
}

async fn record(
    State(state): State<TrackerState>,
    Json(event): Json<PlaybackEvent>,
) -> StatusCode {
    let _ = state.tx.send(event);
    state.reply
}

impl FakeTracker {
    /// Start a tracker answering every POST with `reply`
    pub async fn start(reply: StatusCode) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let app = Router::new()
            .route("/reproducciones", post(record))
            .with_state(TrackerState { tx, reply });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake tracker");
        let addr = listener.local_addr().expect("fake tracker address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, events }
    }

    pub fn url(&self) -> String {
        format!("http://{}/reproducciones", self.addr)
    }

    /// Wait for the next recorded event
    pub async fn next_event(&mut self) -> PlaybackEvent {
        tokio::time::timeout(Duration::from_secs(5), self.events.recv())
            .await
            .expect("tracker notified within 5s")
            .expect("tracker channel open")
    }
}

/// URL on which nothing listens
pub async fn refused_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/reproducciones", addr)
}
