//! Playback event types exchanged with the playback tracker
//!
//! JSON field names follow the tracker's contract (`idUsuario`, `titulo`,
//! `fechaHora`).

use serde::{Deserialize, Serialize};

/// Audio file extension stripped from song names to obtain the title
pub const AUDIO_EXTENSION: &str = ".mp3";

/// Song title for a requested song name: `"Flaca.mp3"` and `"Flaca"` both give `"Flaca"`
pub fn strip_audio_extension(song_name: &str) -> &str {
    song_name.strip_suffix(AUDIO_EXTENSION).unwrap_or(song_name)
}

/// A playback notification sent to the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackEvent {
    #[serde(rename = "idUsuario")]
    pub user_id: u32,
    #[serde(rename = "titulo")]
    pub title: String,
}

impl PlaybackEvent {
    pub fn new(user_id: u32, title: impl Into<String>) -> Self {
        Self {
            user_id,
            title: title.into(),
        }
    }
}

/// A playback stored by the tracker, timestamped on arrival
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackRecord {
    #[serde(rename = "idUsuario")]
    pub user_id: u32,
    #[serde(rename = "titulo")]
    pub title: String,
    /// Local time, `YYYY-MM-DD HH:MM:SS`
    #[serde(rename = "fechaHora")]
    pub played_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_audio_extension() {
        assert_eq!(strip_audio_extension("Flaca.mp3"), "Flaca");
        assert_eq!(strip_audio_extension("Flaca"), "Flaca");
        assert_eq!(strip_audio_extension("Tren al Sur.mp3"), "Tren al Sur");
        // Only the trailing suffix is removed
        assert_eq!(strip_audio_extension("a.mp3.mp3"), "a.mp3");
        assert_eq!(strip_audio_extension("Song.MP3"), "Song.MP3");
    }

    #[test]
    fn test_event_json_field_names() {
        let event = PlaybackEvent::new(7, "Tren al Sur");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({"idUsuario": 7, "titulo": "Tren al Sur"}));
    }

    #[test]
    fn test_record_json_field_names() {
        let record: PlaybackRecord = serde_json::from_str(
            r#"{"idUsuario": 1, "titulo": "Flaca", "fechaHora": "2025-10-21 11:00:00"}"#,
        )
        .unwrap();
        assert_eq!(record.user_id, 1);
        assert_eq!(record.played_at, "2025-10-21 11:00:00");
    }
}
