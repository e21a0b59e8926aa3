//! Commands accepted by the session thread.

use crate::library::Track;
use crate::session::Playlist;

#[derive(Debug)]
pub enum SessionCmd {
    /// Load `track` and start it. With a playlist, the cursor moves to `index`.
    Play {
        track: Track,
        playlist: Option<Playlist>,
        index: Option<usize>,
    },
    /// Pause/resume the loaded preview.
    TogglePlayback,
    /// Absolute volume; clamped by the session.
    SetVolume(f32),
    Next,
    Prev,
    /// Unload everything and clear the playlist.
    Stop,
    /// Stop and end the thread.
    Quit,
}
