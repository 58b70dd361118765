//! Upload checks for user-supplied media.
//!
//! Files themselves live in object storage under a per-user prefix; this
//! module only decides whether an upload is acceptable and where it goes.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::error::ConfigError;

const MIB: u64 = 1024 * 1024;

/// The kinds of media a project can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    SongCover,
    SongAudio,
    Collage,
    VoiceRecording,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaKind::SongCover => "song cover",
            MediaKind::SongAudio => "song audio",
            MediaKind::Collage => "memory collage",
            MediaKind::VoiceRecording => "voice recording",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaError {
    #[error("{kind} is {size} bytes, max is {max} bytes")]
    TooLarge { kind: MediaKind, size: u64, max: u64 },

    #[error("{kind} is empty")]
    Empty { kind: MediaKind },

    #[error("invalid storage path: {0}")]
    InvalidPath(String),
}

/// Per-kind upload size limits in bytes.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MediaLimits {
    pub song_cover_max_bytes: u64,
    pub song_audio_max_bytes: u64,
    pub collage_max_bytes: u64,
    pub voice_max_bytes: u64,
}

impl Default for MediaLimits {
    fn default() -> Self {
        Self {
            song_cover_max_bytes: 5 * MIB,
            song_audio_max_bytes: 10 * MIB,
            collage_max_bytes: 10 * MIB,
            voice_max_bytes: 10 * MIB,
        }
    }
}

impl MediaLimits {
    pub fn max_bytes(&self, kind: MediaKind) -> u64 {
        match kind {
            MediaKind::SongCover => self.song_cover_max_bytes,
            MediaKind::SongAudio => self.song_audio_max_bytes,
            MediaKind::Collage => self.collage_max_bytes,
            MediaKind::VoiceRecording => self.voice_max_bytes,
        }
    }

    /// Reject an upload before it is sent anywhere.
    pub fn check_upload(&self, kind: MediaKind, size: u64) -> Result<(), MediaError> {
        if size == 0 {
            return Err(MediaError::Empty { kind });
        }
        let max = self.max_bytes(kind);
        if size > max {
            return Err(MediaError::TooLarge { kind, size, max });
        }
        Ok(())
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        for kind in [
            MediaKind::SongCover,
            MediaKind::SongAudio,
            MediaKind::Collage,
            MediaKind::VoiceRecording,
        ] {
            if self.max_bytes(kind) == 0 {
                return Err(ConfigError::Invalid(format!("{kind} limit must be positive")));
            }
        }
        Ok(())
    }
}

/// Object storage key for a user's file: `<user_id>/<path>`.
///
/// Uploads replace whatever is at the same key, so the caller picks stable
/// relative paths (e.g. `songs/0/cover.jpg`).
pub fn storage_path(user_id: Uuid, path: &str) -> Result<String, MediaError> {
    let path = path.trim_start_matches('/');
    if path.is_empty() || path.split('/').any(|part| part.is_empty() || part == "..") {
        return Err(MediaError::InvalidPath(path.to_string()));
    }
    Ok(format!("{}/{}", user_id, path))
}
