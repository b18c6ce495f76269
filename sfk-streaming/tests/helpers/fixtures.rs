//! Audio folder fixtures

use std::path::Path;
use tempfile::TempDir;

/// Deterministic byte pattern of `len` bytes; `seed` keeps songs distinguishable
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| ((i % 251) as u8).wrapping_add(seed))
        .collect()
}

/// Temporary shared audio folder
pub struct AudioFolder {
    dir: TempDir,
}

impl AudioFolder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp audio folder"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `<title>.mp3` with generated content and return the bytes
    pub fn add_song(&self, title: &str, len: usize, seed: u8) -> Vec<u8> {
        let data = pattern(len, seed);
        std::fs::write(self.dir.path().join(format!("{}.mp3", title)), &data)
            .expect("write song fixture");
        data
    }
}
