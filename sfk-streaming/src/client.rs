//! Stream client
//!
//! Requests a song from the streaming server and decodes the framed body.
//! Dropping a [`ChunkStream`] closes the connection, which the server sees as a
//! client cancellation.

use bytes::Bytes;
use sfk_common::wire::{Frame, FrameDecoder};
use sfk_common::StreamStatus;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::dispatcher::StreamRequest;
use crate::error::{Error, Result};

/// What a completed fetch delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub chunks: u64,
    pub bytes: u64,
    pub status: StreamStatus,
}

/// HTTP client for `POST /api/v1/stream`
#[derive(Clone)]
pub struct StreamClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl StreamClient {
    /// `base_url` like `http://localhost:50051`
    pub fn new(base_url: &str) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/api/v1/stream", base_url.trim_end_matches('/')),
        })
    }

    /// Start a stream and return it for incremental reading
    pub async fn open(&self, request: &StreamRequest) -> Result<ChunkStream> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http(format!("server answered {}: {}", status, body)));
        }

        Ok(ChunkStream {
            response,
            decoder: FrameDecoder::new(),
            chunks: 0,
            status: None,
        })
    }

    /// Stream a song into `out` and return the final status
    pub async fn fetch<W>(&self, request: &StreamRequest, out: &mut W) -> Result<FetchSummary>
    where
        W: AsyncWrite + Unpin,
    {
        let mut stream = self.open(request).await?;
        let mut bytes = 0u64;

        while let Some(chunk) = stream.next_chunk().await? {
            out.write_all(&chunk).await?;
            bytes += chunk.len() as u64;
        }
        out.flush().await?;

        let chunks = stream.chunks_received();
        let status = stream.into_status().ok_or(Error::Truncated(chunks))?;
        Ok(FetchSummary {
            chunks,
            bytes,
            status,
        })
    }

    /// Save a song to `output`
    ///
    /// Bytes go to `<output>.part` first, which is renamed into place only when
    /// the server ends the stream with `OK`. On any other status, or on error,
    /// the partial file is removed and `output` is left untouched.
    pub async fn download(&self, request: &StreamRequest, output: &Path) -> Result<FetchSummary> {
        let part = part_path(output);
        let result = async {
            let mut file = tokio::fs::File::create(&part).await?;
            let summary = self.fetch(request, &mut file).await?;
            file.sync_all().await?;
            Ok::<FetchSummary, Error>(summary)
        }
        .await;

        match result {
            Ok(summary) if summary.status.is_ok() => {
                tokio::fs::rename(&part, output).await?;
                Ok(summary)
            }
            other => {
                if let Err(e) = tokio::fs::remove_file(&part).await {
                    debug!("Could not remove {}: {}", part.display(), e);
                }
                other
            }
        }
    }
}

fn part_path(output: &Path) -> PathBuf {
    let mut name = output.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// An open stream being decoded frame by frame
pub struct ChunkStream {
    response: reqwest::Response,
    decoder: FrameDecoder,
    chunks: u64,
    status: Option<StreamStatus>,
}

impl ChunkStream {
    /// Next audio chunk; `Ok(None)` once the status trailer arrived
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        if self.status.is_some() {
            return Ok(None);
        }

        loop {
            match self.decoder.next_frame()? {
                Some(Frame::Data(payload)) => {
                    self.chunks += 1;
                    return Ok(Some(payload));
                }
                Some(Frame::Status(status)) => {
                    debug!(chunks = self.chunks, "Stream trailer: {}", status);
                    self.status = Some(status);
                    return Ok(None);
                }
                None => {}
            }

            match self
                .response
                .chunk()
                .await
                .map_err(|e| Error::Http(e.to_string()))?
            {
                Some(bytes) => self.decoder.push(&bytes),
                None => return Err(Error::Truncated(self.chunks)),
            }
        }
    }

    pub fn chunks_received(&self) -> u64 {
        self.chunks
    }

    /// Terminal status, once the trailer was read
    pub fn status(&self) -> Option<&StreamStatus> {
        self.status.as_ref()
    }

    pub fn into_status(self) -> Option<StreamStatus> {
        self.status
    }
}
