//! # SFK Streaming Server Library (sfk-streaming)
//!
//! Audio delivery path: streams a stored song to a client as fixed-size,
//! framed chunks over HTTP, and reports the playback to the tracker service
//! from a detached background task.
//!
//! **Architecture:**
//! - [`source`] reads a song lazily in 32 KiB chunks
//! - [`classify`] maps read/send failures to stream outcomes and statuses
//! - [`sidecar`] fires the playback notification and forgets it
//! - [`dispatcher`] drives one request through its state machine
//! - [`api`] exposes the dispatcher over Axum; [`client`] consumes it

pub mod api;
pub mod classify;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod sidecar;
pub mod source;
pub mod state;

pub use classify::StreamOutcome;
pub use dispatcher::{StreamDispatcher, StreamReport, StreamRequest};
pub use error::{Error, Result};
pub use state::SharedState;
