//! Response-body sink
//!
//! Feeds framed chunks into the HTTP response body through a bounded channel of
//! capacity 1: a send completes only once the body has taken the previous
//! frame.
//!
//! A failed send is classified by who ended it. When the client disconnects the
//! body is dropped along with the receiver and the next send reports a
//! cancellation. When the server shuts down, the shutdown token fires and any
//! pending or later send reports the transport as unavailable, so the client
//! still gets an `UNAVAILABLE` trailer. A dropped HTTP/1 body looks the same
//! whether the client cancelled or the connection broke; both read as
//! cancellation.

use async_trait::async_trait;
use bytes::Bytes;
use sfk_common::wire::{encode_data, encode_status};
use std::convert::Infallible;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::classify::{StreamOutcome, TransportFailure};
use crate::dispatcher::ChunkSink;
use crate::source::Chunk;

/// Items carried by the response body
pub type BodyItem = Result<Bytes, Infallible>;

/// Sending half of a framed response body
pub struct ChannelSink {
    tx: mpsc::Sender<BodyItem>,
    shutdown: CancellationToken,
}

/// Create the sink plus the stream to hand to `Body::from_stream`
///
/// `shutdown` interrupts the stream from the server side.
pub fn channel_sink(shutdown: CancellationToken) -> (ChannelSink, ReceiverStream<BodyItem>) {
    let (tx, rx) = mpsc::channel(1);
    (ChannelSink { tx, shutdown }, ReceiverStream::new(rx))
}

impl ChannelSink {
    /// Write the status trailer for `outcome`
    ///
    /// Nothing is written for a cancelled stream: nobody is listening.
    pub async fn finish(self, outcome: StreamOutcome) {
        if outcome == StreamOutcome::CancelledByClient {
            return;
        }
        let status = outcome.status();
        if self.tx.send(Ok(encode_status(&status))).await.is_err() {
            debug!("Client left before the {} trailer", status.code);
        }
    }
}

#[async_trait]
impl ChunkSink for ChannelSink {
    async fn send(&mut self, chunk: Chunk) -> Result<(), TransportFailure> {
        let frame = encode_data(&chunk.payload);
        tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => {
                Err(TransportFailure::unavailable("server shutting down"))
            }
            sent = self.tx.send(Ok(frame)) => {
                sent.map_err(|_| TransportFailure::cancelled("response body dropped by client"))
            }
        }
    }
}
