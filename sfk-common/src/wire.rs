//! Streaming wire format
//!
//! A stream response body is a sequence of length-prefixed frames:
//!
//! ```text
//! +------+----------------+-------------------+
//! | flag | length (u32 BE)| payload (length)  |
//! +------+----------------+-------------------+
//! ```
//!
//! - flag `0x00`: DATA frame, payload is one audio chunk
//! - flag `0x80`: STATUS frame (trailer), payload is `"<CODE> <message>"` in UTF-8
//!
//! A well-formed stream carries zero or more DATA frames followed by exactly one
//! STATUS frame. A stream the client cancelled simply stops.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::status::StreamStatus;

/// Content type of a framed stream response
pub const STREAM_CONTENT_TYPE: &str = "application/x-sfk-stream";

/// Flag byte of a DATA frame
pub const DATA_FLAG: u8 = 0x00;

/// Flag byte of a STATUS (trailer) frame
pub const STATUS_FLAG: u8 = 0x80;

/// Flag byte plus u32 length
pub const HEADER_LEN: usize = 5;

/// Upper bound on a single frame payload (guards the decoder buffer)
pub const MAX_FRAME_LEN: usize = 4 * 1024 * 1024;

/// Wire decoding errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("unknown frame flag 0x{0:02x}")]
    UnknownFlag(u8),

    #[error("frame length {0} exceeds the 4 MiB limit")]
    TooLarge(usize),

    #[error("invalid status trailer: {0}")]
    InvalidStatus(String),
}

/// One decoded frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Data(Bytes),
    Status(StreamStatus),
}

/// Encode one audio chunk as a DATA frame
pub fn encode_data(payload: &[u8]) -> Bytes {
    encode(DATA_FLAG, payload)
}

/// Encode the terminal status as a STATUS frame
pub fn encode_status(status: &StreamStatus) -> Bytes {
    encode(STATUS_FLAG, status.to_string().as_bytes())
}

fn encode(flag: u8, payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_LEN + payload.len());
    buf.put_u8(flag);
    buf.put_u32(payload.len() as u32);
    buf.put_slice(payload);
    buf.freeze()
}

/// Incremental frame decoder
///
/// Bytes arrive in whatever pieces the transport delivers; frames are only
/// yielded once complete.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: BytesMut,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append bytes received from the transport
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Number of buffered bytes not yet consumed as a frame
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Next complete frame, or `None` if more bytes are needed
    pub fn next_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        if self.buffer.len() < HEADER_LEN {
            return Ok(None);
        }

        let flag = self.buffer[0];
        if flag != DATA_FLAG && flag != STATUS_FLAG {
            return Err(FrameError::UnknownFlag(flag));
        }

        let len = u32::from_be_bytes([
            self.buffer[1],
            self.buffer[2],
            self.buffer[3],
            self.buffer[4],
        ]) as usize;
        if len > MAX_FRAME_LEN {
            return Err(FrameError::TooLarge(len));
        }
        if self.buffer.len() < HEADER_LEN + len {
            return Ok(None);
        }

        self.buffer.advance(HEADER_LEN);
        let payload = self.buffer.split_to(len).freeze();

        if flag == DATA_FLAG {
            return Ok(Some(Frame::Data(payload)));
        }

        let text = std::str::from_utf8(&payload)
            .map_err(|e| FrameError::InvalidStatus(e.to_string()))?;
        let status = text.parse().map_err(FrameError::InvalidStatus)?;
        Ok(Some(Frame::Status(status)))
    }
}
