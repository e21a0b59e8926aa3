use std::sync::{Arc, Mutex};

use crate::library::Track;

/// Ordered tracks shared between the UI and the session without copying.
pub type Playlist = Arc<[Track]>;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing loaded.
    #[default]
    Idle,
    /// A preview is being fetched/decoded.
    Loading,
    Playing,
    Paused,
}

/// Snapshot of the session published after every transition.
#[derive(Debug, Clone)]
pub struct PlaybackInfo {
    pub state: PlaybackState,
    /// The loaded track; `Some` exactly when a handle is held.
    pub track: Option<Track>,
    /// The track being loaded while `state` is `Loading`.
    pub loading: Option<Track>,
    pub volume: f32,
    pub playlist: Playlist,
    /// Meaningful only when `playlist` is non-empty.
    pub cursor: usize,
}

impl PlaybackInfo {
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }
}

impl Default for PlaybackInfo {
    fn default() -> Self {
        Self {
            state: PlaybackState::Idle,
            track: None,
            loading: None,
            volume: 1.0,
            playlist: Arc::from(Vec::new()),
            cursor: 0,
        }
    }
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
