//! HTTP API for the streaming server
//!
//! `POST /api/v1/stream` carries the one streaming method; `GET /health`
//! reports liveness and stream counters; `GET /api/v1/events` is an SSE feed of
//! finished streams.

pub mod events;
pub mod handlers;
pub mod server;
pub mod sink;

pub use server::{create_router, run, AppContext};
