use thiserror::Error;

use crate::audio::EngineError;
use crate::notify::Notice;

/// Why a session operation did not do what was asked.
///
/// These never leave the session; each one becomes exactly one `Notice`.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("track {0:?} has no preview")]
    NoPreview(String),
    #[error("playlist is empty")]
    EmptyPlaylist,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl PlaybackError {
    pub fn notice(&self) -> Notice {
        match self {
            PlaybackError::NoPreview(name) => Notice::NoPreview {
                track: name.clone(),
            },
            PlaybackError::EmptyPlaylist => Notice::EmptyPlaylist,
            PlaybackError::Engine(_) => Notice::PlaybackFailed,
        }
    }
}
