//! Application model: `App`.
//!
//! The `App` struct holds the track list, the selected row and the handles the
//! UI reads playback state and notices from.

use std::sync::Arc;

use crate::audio::SessionCmd;
use crate::library::Track;
use crate::notify::StatusLine;
use crate::session::{PlaybackHandle, PlaybackInfo, Playlist};

/// The main application model.
pub struct App {
    /// Shown list; also handed to the session as the playlist on play.
    pub tracks: Playlist,
    pub selected: usize,
    pub playback_handle: Option<PlaybackHandle>,
    pub status: Option<StatusLine>,

    /// Whether the selection follows the session cursor.
    pub follow_playback: bool,
    pub pending_follow_index: Option<usize>,

    pub volume_step: f32,
    /// Last volume sent to the session and not yet published back.
    pub volume_target: Option<f32>,
    /// Where the tracks came from (directory or manifest name).
    pub source_label: Option<String>,
}

impl App {
    /// Create a new `App` with the provided list of `tracks`.
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks: Arc::from(tracks),
            selected: 0,
            playback_handle: None,
            status: None,

            follow_playback: true,
            pending_follow_index: None,

            volume_step: 0.05,
            volume_target: None,
            source_label: None,
        }
    }

    /// Attach a `PlaybackHandle` used to observe the session.
    pub fn set_playback_handle(&mut self, h: PlaybackHandle) {
        self.playback_handle = Some(h);
    }

    pub fn set_status_line(&mut self, status: StatusLine) {
        self.status = Some(status);
    }

    pub fn set_source_label(&mut self, label: String) {
        self.source_label = Some(label);
    }

    /// Latest session snapshot, or an idle one when nothing is attached.
    pub fn playback(&self) -> PlaybackInfo {
        self.playback_handle
            .as_ref()
            .and_then(|h| h.lock().ok().map(|i| i.clone()))
            .unwrap_or_default()
    }

    /// The notice to show, if any.
    pub fn notice(&self) -> Option<String> {
        self.status.as_ref().and_then(StatusLine::current)
    }

    /// Dismiss the notice before it expires.
    pub fn dismiss_notice(&mut self) {
        if let Some(status) = &self.status {
            status.clear();
        }
    }

    pub fn has_tracks(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.tracks.get(self.selected)
    }

    pub fn set_selected(&mut self, idx: usize) {
        if self.has_tracks() {
            self.selected = idx.min(self.tracks.len() - 1);
        }
    }

    /// Move selection down, wrapping to the top.
    pub fn next(&mut self) {
        if self.has_tracks() {
            self.selected = (self.selected + 1) % self.tracks.len();
        }
    }

    /// Move selection up, wrapping to the bottom.
    pub fn prev(&mut self) {
        if self.has_tracks() {
            self.selected = match self.selected {
                0 => self.tracks.len() - 1,
                i => i - 1,
            };
        }
    }

    pub fn first(&mut self) {
        self.selected = 0;
    }

    pub fn last(&mut self) {
        self.selected = self.tracks.len().saturating_sub(1);
    }

    /// Enable follow-playback. Any pending follow index is dropped so the
    /// selection tracks whatever the session plays next.
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
        self.pending_follow_index = None;
    }

    /// Disable follow-playback and clear any pending follow index.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
        self.pending_follow_index = None;
    }

    /// Command that plays the selected row with the whole list as playlist.
    pub fn play_selected(&mut self) -> Option<SessionCmd> {
        let track = self.selected_track()?.clone();
        self.follow_playback_on();
        // Rows without a preview are refused by the session; the cursor will
        // never get there.
        if track.preview().is_some() {
            self.pending_follow_index = Some(self.selected);
        }
        Some(SessionCmd::Play {
            track,
            playlist: Some(self.tracks.clone()),
            index: Some(self.selected),
        })
    }

    /// Command that moves the volume by `steps` times `volume_step`,
    /// clamped to `0.0..=1.0`.
    ///
    /// Steps start from the last volume sent, not the published one, so
    /// presses queued behind a slow load still add up.
    pub fn volume_by(&mut self, steps: f32) -> SessionCmd {
        let current = self
            .volume_target
            .unwrap_or_else(|| self.playback().volume);
        let target = (current + steps * self.volume_step).clamp(0.0, 1.0);
        self.volume_target = Some(target);
        SessionCmd::SetVolume(target)
    }

    /// Remember a volume sent from elsewhere (MPRIS). NaN is dropped by the
    /// session, so it is not remembered either.
    pub fn note_volume_target(&mut self, volume: f32) {
        if !volume.is_nan() {
            self.volume_target = Some(volume.clamp(0.0, 1.0));
        }
    }

    /// Forget the volume target once the session has published it.
    pub fn sync_volume(&mut self, info: &PlaybackInfo) {
        if self.volume_target == Some(info.volume) {
            self.volume_target = None;
        }
    }

    /// Move the selection to the session cursor, when the session is playing
    /// this list and following is on.
    pub fn sync_follow(&mut self, info: &PlaybackInfo) {
        if !self.follow_playback || info.track.is_none() {
            return;
        }
        if !Arc::ptr_eq(&info.playlist, &self.tracks) {
            return;
        }

        let idx = info.cursor;
        // Right after `play_selected` the old snapshot may still be published;
        // wait until the cursor reaches the requested row.
        if let Some(pending) = self.pending_follow_index {
            if pending != idx {
                return;
            }
            self.pending_follow_index = None;
        }
        if self.selected != idx {
            self.set_selected(idx);
        }
    }
}
