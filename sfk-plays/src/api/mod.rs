//! HTTP API handlers for sfk-plays

pub mod health;
pub mod plays;

pub use health::health_routes;
pub use plays::{list_plays, plays_routes, record_play};
