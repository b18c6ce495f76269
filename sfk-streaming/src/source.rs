//! Chunked audio file source
//!
//! Opens a song under the shared audio folder and yields its bytes as a lazy,
//! finite, non-restartable sequence of fixed-size chunks. The file handle is
//! owned by [`ChunkedFile`] and closed when it is dropped, whichever way the
//! stream ends.

use bytes::Bytes;
use sfk_common::playback::{strip_audio_extension, AUDIO_EXTENSION};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Fixed chunk size (32 KiB)
pub const CHUNK_SIZE: usize = 32 * 1024;

/// Source failures
#[derive(Debug, Error)]
pub enum SourceError {
    /// Song name cannot map to a file inside the audio folder
    #[error("invalid song name {0:?}")]
    InvalidName(String),

    /// File could not be opened (missing, permissions, not a regular file)
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Read failed after the file was opened
    #[error("read failed on {label}: {source}")]
    Read {
        label: String,
        #[source]
        source: std::io::Error,
    },
}

/// One bounded unit of audio payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub payload: Bytes,
}

impl Chunk {
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Map a song name to its file name: `<title>.mp3`
///
/// `"Flaca"` and `"Flaca.mp3"` both address `Flaca.mp3`. Anything that could
/// escape the audio folder is rejected.
pub fn resolve_file_name(song_name: &str) -> Result<String, SourceError> {
    let title = strip_audio_extension(song_name);
    let invalid = title.is_empty()
        || title == "."
        || title == ".."
        || title.contains(['/', '\\', '\0']);
    if invalid {
        return Err(SourceError::InvalidName(song_name.to_string()));
    }
    Ok(format!("{}{}", title, AUDIO_EXTENSION))
}

/// Read-only view of the shared audio folder
#[derive(Debug, Clone)]
pub struct ChunkedFileSource {
    root: PathBuf,
}

impl ChunkedFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open a song for chunked reading
    pub async fn open(&self, song_name: &str) -> Result<ChunkedFile<File>, SourceError> {
        let path = self.root.join(resolve_file_name(song_name)?);

        let file = File::open(&path).await.map_err(|source| SourceError::Open {
            path: path.clone(),
            source,
        })?;
        let metadata = file.metadata().await.map_err(|source| SourceError::Open {
            path: path.clone(),
            source,
        })?;
        if !metadata.is_file() {
            return Err(SourceError::Open {
                path,
                source: std::io::Error::new(ErrorKind::NotFound, "not a regular file"),
            });
        }

        let label = path.display().to_string();
        Ok(ChunkedFile::with_length(file, label, Some(metadata.len())))
    }
}

/// An opened resource being read chunk by chunk
#[derive(Debug)]
pub struct ChunkedFile<R> {
    reader: R,
    label: String,
    length: Option<u64>,
    exhausted: bool,
    chunks_read: u64,
}

impl<R> ChunkedFile<R>
where
    R: AsyncRead + Unpin + Send,
{
    /// Wrap any reader; `label` names it in logs and errors
    pub fn new(reader: R, label: impl Into<String>) -> Self {
        Self::with_length(reader, label, None)
    }

    fn with_length(reader: R, label: impl Into<String>, length: Option<u64>) -> Self {
        Self {
            reader,
            label: label.into(),
            length,
            exhausted: false,
            chunks_read: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Byte length at open time, when known
    pub fn length(&self) -> Option<u64> {
        self.length
    }

    pub fn chunks_read(&self) -> u64 {
        self.chunks_read
    }

    /// Read the next chunk; `Ok(None)` marks the end of the stream
    ///
    /// Every chunk but the last is exactly [`CHUNK_SIZE`] bytes: short reads
    /// from the reader are topped up before the chunk is returned.
    pub async fn next_chunk(&mut self) -> Result<Option<Chunk>, SourceError> {
        if self.exhausted {
            return Ok(None);
        }

        let mut buf = vec![0u8; CHUNK_SIZE];
        let mut filled = 0;
        while filled < CHUNK_SIZE {
            match self.reader.read(&mut buf[filled..]).await {
                Ok(0) => {
                    self.exhausted = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    self.exhausted = true;
                    return Err(SourceError::Read {
                        label: self.label.clone(),
                        source,
                    });
                }
            }
        }

        if filled == 0 {
            return Ok(None);
        }

        buf.truncate(filled);
        self.chunks_read += 1;
        Ok(Some(Chunk::new(buf)))
    }
}
