//! Test helper modules for sfk-streaming integration tests
//!
//! - AudioFolder: temporary shared audio folder with generated songs
//! - VecSink / CancellingSink: in-memory chunk sinks
//! - RecordingReporter: captures playback events
//! - FakeTracker: loopback HTTP tracker answering with a chosen status

#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod recorders;

pub use fixtures::{pattern, AudioFolder};
pub use recorders::{
    refused_url, CancellingSink, FakeTracker, RecordingReporter, StalledReporter, VecSink,
};
