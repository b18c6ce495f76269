//! In-memory playback store
//!
//! Records are kept in arrival order behind a single mutex. Nothing is
//! persisted; a restart starts from an empty (or sample) list.

use chrono::Local;
use sfk_common::{strip_audio_extension, PlaybackRecord};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Timestamp layout of `fechaHora`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Playback history shared by all handlers
#[derive(Debug, Default)]
pub struct PlaybackStore {
    records: Mutex<Vec<PlaybackRecord>>,
}

impl PlaybackStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with demo records
    pub fn with_sample_data() -> Self {
        let samples = [
            (1, "Lamento Boliviano", "2025-10-20 10:00:00"),
            (2, "De Musica Ligera", "2025-10-20 10:05:00"),
            (1, "Lloraras", "2025-10-20 10:10:00"),
            (1, "Flaca", "2025-10-21 11:00:00"),
        ];

        let records = samples
            .into_iter()
            .map(|(user_id, title, played_at)| PlaybackRecord {
                user_id,
                title: title.to_string(),
                played_at: played_at.to_string(),
            })
            .collect();

        Self {
            records: Mutex::new(records),
        }
    }

    /// Append a playback stamped with the current local time
    pub fn record(&self, user_id: u32, title: &str) -> PlaybackRecord {
        let record = PlaybackRecord {
            user_id,
            title: strip_audio_extension(title).to_string(),
            played_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };

        self.lock().push(record.clone());
        debug!(user_id, title = %record.title, "Playback stored");
        record
    }

    /// Every record, oldest first
    pub fn all(&self) -> Vec<PlaybackRecord> {
        self.lock().clone()
    }

    /// Records of one user, oldest first
    pub fn for_user(&self, user_id: u32) -> Vec<PlaybackRecord> {
        self.lock()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // A panic while holding the lock cannot leave a half-written record
    fn lock(&self) -> MutexGuard<'_, Vec<PlaybackRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
