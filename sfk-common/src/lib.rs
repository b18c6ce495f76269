//! # SFK Common Library
//!
//! Shared code for the SFK services:
//! - Error type shared by the library modules
//! - Stream status codes and the chunk framing used on the streaming wire
//! - Playback event/record DTOs exchanged with the playback tracker
//! - Configuration loading and audio folder resolution

pub mod config;
pub mod error;
pub mod playback;
pub mod status;
pub mod wire;

pub use error::{Error, Result};
pub use playback::{strip_audio_extension, PlaybackEvent, PlaybackRecord};
pub use status::{StatusCode, StreamStatus};
