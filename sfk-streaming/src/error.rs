//! Error types for sfk-streaming
//!
//! Per-stream failures never surface here: they end as a [`crate::classify::StreamOutcome`].
//! These errors cover the server loop and the stream client.

use thiserror::Error;

/// Main error type for sfk-streaming
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP server or client errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Malformed stream body
    #[error("Protocol error: {0}")]
    Protocol(#[from] sfk_common::wire::FrameError),

    /// Stream ended without a status trailer
    #[error("Stream ended without a status trailer after {0} chunks")]
    Truncated(u64),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type using sfk-streaming Error
pub type Result<T> = std::result::Result<T, Error>;
