//! Stream outcome classification
//!
//! Maps raw failures from the file source and the outbound transport onto the
//! stream outcome taxonomy, and each outcome onto the status the client sees.
//! Independent of the HTTP framework: transports describe a failed send with a
//! [`TransportFailure`] and the classifier decides what it means.

use serde::Serialize;
use sfk_common::{StatusCode, StreamStatus};
use std::fmt;

use crate::source::SourceError;

/// Terminal state of one stream invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamOutcome {
    Completed,
    CancelledByClient,
    NotFound,
    ReadFailure,
    SendFailure,
}

impl StreamOutcome {
    /// Status delivered to the client
    ///
    /// A cancelled stream ends cleanly from the server's side, so it maps to `OK`.
    pub fn status(&self) -> StreamStatus {
        match self {
            StreamOutcome::Completed | StreamOutcome::CancelledByClient => StreamStatus::ok(),
            StreamOutcome::NotFound => StreamStatus::new(StatusCode::NotFound, "resource not found"),
            StreamOutcome::ReadFailure => {
                StreamStatus::new(StatusCode::Internal, "internal read error")
            }
            StreamOutcome::SendFailure => {
                StreamStatus::new(StatusCode::Unavailable, "transport interrupted")
            }
        }
    }

    /// Whether the outcome is reported to the client as an error
    pub fn is_error(&self) -> bool {
        !self.status().is_ok()
    }
}

impl fmt::Display for StreamOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamOutcome::Completed => "completed",
            StreamOutcome::CancelledByClient => "cancelled by client",
            StreamOutcome::NotFound => "not found",
            StreamOutcome::ReadFailure => "read failure",
            StreamOutcome::SendFailure => "send failure",
        };
        f.write_str(name)
    }
}

/// Why a transport refused a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportCode {
    /// The client ended the call
    Cancelled,
    /// Connection broke or the peer stopped responding
    Unavailable,
    /// Anything else the transport reports
    Unknown,
}

/// Raw send failure as reported by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportFailure {
    pub code: TransportCode,
    pub detail: String,
}

impl TransportFailure {
    pub fn new(code: TransportCode, detail: impl Into<String>) -> Self {
        Self {
            code,
            detail: detail.into(),
        }
    }

    pub fn cancelled(detail: impl Into<String>) -> Self {
        Self::new(TransportCode::Cancelled, detail)
    }

    pub fn unavailable(detail: impl Into<String>) -> Self {
        Self::new(TransportCode::Unavailable, detail)
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.detail)
    }
}

/// Classify a failure from the file source
///
/// Anything that fails before the resource is open is `NotFound`; anything
/// after is a read failure.
pub fn classify_source_error(error: &SourceError) -> StreamOutcome {
    match error {
        SourceError::InvalidName(_) | SourceError::Open { .. } => StreamOutcome::NotFound,
        SourceError::Read { .. } => StreamOutcome::ReadFailure,
    }
}

/// Classify a failed send: only an explicit cancellation is benign
pub fn classify_send_failure(failure: &TransportFailure) -> StreamOutcome {
    match failure.code {
        TransportCode::Cancelled => StreamOutcome::CancelledByClient,
        TransportCode::Unavailable | TransportCode::Unknown => StreamOutcome::SendFailure,
    }
}
