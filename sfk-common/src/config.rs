//! Configuration loading and audio folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Shared audio folder used when nothing else is configured
pub const DEFAULT_AUDIO_DIR: &str = "../AudiosCompartidos";

/// Playback tracker endpoint used when nothing else is configured
pub const DEFAULT_TRACKER_URL: &str = "http://localhost:5002/reproducciones";

/// Environment variable overriding the audio folder
pub const AUDIO_DIR_ENV: &str = "SFK_AUDIO_DIR";

/// Optional TOML configuration file
///
/// ```toml
/// audio_dir = "/srv/music"
/// tracker_url = "http://tracker:5002/reproducciones"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TomlConfig {
    pub audio_dir: Option<PathBuf>,
    pub tracker_url: Option<String>,
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the explicit config file, else the per-user default, else nothing
    ///
    /// A missing or malformed file never aborts startup; it is logged and the
    /// empty config is used.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Self::default(),
            },
        };

        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Per-user config file location (`~/.config/sfk/config.toml` on Linux)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sfk").join("config.toml"))
}

/// Audio folder resolution, in priority order:
/// 1. Command-line argument
/// 2. `SFK_AUDIO_DIR` environment variable
/// 3. `audio_dir` in the TOML config
/// 4. Compiled default (`../AudiosCompartidos`)
pub fn resolve_audio_dir(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(AUDIO_DIR_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.audio_dir {
        return path.clone();
    }

    PathBuf::from(DEFAULT_AUDIO_DIR)
}

/// Tracker URL: command line / env (handled by clap), then TOML, then default
pub fn resolve_tracker_url(cli_arg: Option<&str>, config: &TomlConfig) -> String {
    cli_arg
        .map(str::to_string)
        .or_else(|| config.tracker_url.clone())
        .unwrap_or_else(|| DEFAULT_TRACKER_URL.to_string())
}

/// Verify the audio folder exists and return its absolute path
///
/// The streaming server cannot serve anything without it, so callers treat an
/// error here as fatal.
pub fn ensure_audio_dir(path: &Path) -> Result<PathBuf> {
    let absolute = path.canonicalize().map_err(|e| {
        Error::NotFound(format!("audio folder {}: {}", path.display(), e))
    })?;

    if !absolute.is_dir() {
        return Err(Error::Config(format!(
            "audio folder {} is not a directory",
            absolute.display()
        )));
    }

    Ok(absolute)
}
