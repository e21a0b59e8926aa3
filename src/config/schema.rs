use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/miniplay/config.toml` or `~/.config/miniplay/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `MINIPLAY__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub library: LibrarySettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Session volume at startup, `0.0..=1.0`.
    pub initial_volume: f32,
    /// How much `+`/`-` change the volume.
    pub volume_step: f32,
    /// Upper bound for a single audio engine call (milliseconds).
    /// Also used as the HTTP timeout for remote previews. 0 disables it.
    pub engine_timeout_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            volume_step: 0.05,
            engine_timeout_ms: 15_000,
        }
    }
}

impl AudioSettings {
    /// `engine_timeout_ms` as a duration; `None` when disabled.
    pub fn engine_timeout(&self) -> Option<Duration> {
        (self.engine_timeout_ms > 0).then(|| Duration::from_millis(self.engine_timeout_ms))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Whether the list selection follows the playing track.
    pub follow_playback: bool,

    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Which track fields make up the mini-player line, and in what order.
    ///
    /// Example: ["artists", "name"]
    pub now_playing_fields: Vec<TrackField>,

    /// Separator used to join `now_playing_fields`.
    pub now_playing_separator: String,

    /// How long a warning stays on the notice line (milliseconds).
    pub notice_ttl_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            follow_playback: true,
            header_text: " ~ previews, on repeat ~ ".to_string(),
            now_playing_fields: vec![TrackField::Name, TrackField::Artists],
            now_playing_separator: " · ".to_string(),
            notice_ttl_ms: 4_000,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackField {
    #[serde(alias = "title")]
    Name,
    #[serde(alias = "artist")]
    Artists,
    Id,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks during scanning.
    pub follow_links: bool,
    /// Whether to include hidden files/directories (dotfiles).
    pub include_hidden: bool,
    /// Whether to recurse into subdirectories.
    pub recursive: bool,
    /// Optional cap on directory recursion depth.
    pub max_depth: Option<usize>,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            extensions: vec![
                "mp3".into(),
                "m4a".into(),
                "flac".into(),
                "wav".into(),
                "ogg".into(),
            ],
            follow_links: true,
            include_hidden: true,
            recursive: true,
            max_depth: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub filter: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/miniplay/miniplay.log`.
    pub path: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: "miniplay=info".to_string(),
            path: None,
        }
    }
}
