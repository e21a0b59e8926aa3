//! User-facing warnings.
//!
//! The session never fails loudly: everything that goes wrong ends up as a
//! `Notice` handed to a `Notifier`. The TUI shows them on a status line and
//! the session logs every one of them as it is raised.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Something the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The track has no preview URL.
    NoPreview { track: String },
    /// Loading or controlling the audio failed.
    PlaybackFailed,
    /// Next/previous was requested without a playlist.
    EmptyPlaylist,
}

impl Notice {
    pub fn title(&self) -> &'static str {
        match self {
            Notice::NoPreview { .. } => "No preview",
            Notice::PlaybackFailed => "Error",
            Notice::EmptyPlaylist => "No playlist",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Notice::NoPreview { track } => format!("\"{track}\" has no preview available."),
            Notice::PlaybackFailed => "Could not play the preview.".to_string(),
            Notice::EmptyPlaylist => "There are no more tracks in the list.".to_string(),
        }
    }
}

/// Sink for user-facing warnings. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn warn(&self, title: &str, message: &str);
}

#[derive(Debug, Clone)]
struct Posted {
    title: String,
    message: String,
    at: Instant,
}

/// The last warning, shown by the UI until it expires.
#[derive(Debug, Clone)]
pub struct StatusLine {
    slot: Arc<Mutex<Option<Posted>>>,
    ttl: Duration,
}

impl StatusLine {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
            ttl,
        }
    }

    /// `Title: message` if a warning was posted less than `ttl` ago.
    pub fn current(&self) -> Option<String> {
        self.current_at(Instant::now())
    }

    fn current_at(&self, now: Instant) -> Option<String> {
        let mut slot = self.slot.lock().ok()?;
        let expired = slot
            .as_ref()
            .is_some_and(|p| now.saturating_duration_since(p.at) >= self.ttl);
        if expired {
            *slot = None;
        }
        slot.as_ref()
            .map(|p| format!("{}: {}", p.title, p.message))
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

impl Notifier for StatusLine {
    fn warn(&self, title: &str, message: &str) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(Posted {
                title: title.to_string(),
                message: message.to_string(),
                at: Instant::now(),
            });
        }
    }
}
