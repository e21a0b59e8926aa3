//! The playback session: one loaded preview, a playlist cursor, play/pause
//! state and volume.
//!
//! `Session` is the only thing allowed to touch an engine handle. Readers look
//! at the published `PlaybackInfo` through a `PlaybackHandle` and never wait on
//! the engine.

mod error;
mod manager;
mod types;

pub use error::PlaybackError;
pub use manager::{Session, SessionOptions};
pub use types::{PlaybackHandle, PlaybackInfo, PlaybackState, Playlist};
