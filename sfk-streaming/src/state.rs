//! Shared streaming state
//!
//! Counters and a broadcast of finished streams, shared by the HTTP handlers.
//! The broadcast feeds the SSE endpoint.
//! Individual streams share nothing else.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;

use crate::classify::StreamOutcome;
use crate::dispatcher::{StreamReport, StreamRequest};

/// Notice published when a stream reaches its terminal state
#[derive(Debug, Clone, serde::Serialize)]
pub struct StreamFinished {
    pub request: StreamRequest,
    pub report: StreamReport,
}

/// Snapshot of the counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct StreamCounters {
    pub active: u64,
    pub completed: u64,
    pub cancelled: u64,
    pub failed: u64,
}

/// Process-wide streaming statistics, created once in `main`
pub struct SharedState {
    active: AtomicU64,
    completed: AtomicU64,
    cancelled: AtomicU64,
    failed: AtomicU64,
    finished_tx: broadcast::Sender<StreamFinished>,
}

impl SharedState {
    pub fn new() -> Self {
        let (finished_tx, _) = broadcast::channel(64);
        Self {
            active: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            cancelled: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            finished_tx,
        }
    }

    pub fn stream_started(&self) {
        self.active.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stream_finished(&self, request: StreamRequest, report: StreamReport) {
        self.active.fetch_sub(1, Ordering::Relaxed);
        let counter = match report.outcome {
            StreamOutcome::Completed => &self.completed,
            StreamOutcome::CancelledByClient => &self.cancelled,
            _ => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        // No subscribers is fine
        let _ = self.finished_tx.send(StreamFinished { request, report });
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StreamFinished> {
        self.finished_tx.subscribe()
    }

    pub fn counters(&self) -> StreamCounters {
        StreamCounters {
            active: self.active.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
