//! Audio engine and the thread that drives the playback session.
//!
//! `AudioEngine` is the seam between the session and real audio output;
//! `RodioEngine` implements it with rodio. `SessionPlayer` runs a `Session`
//! on its own thread and feeds it `SessionCmd`s.

mod engine;
mod player;
mod rodio_engine;
mod sink;
mod source;
mod types;

pub use engine::{AudioEngine, EngineError};
pub use player::SessionPlayer;
pub use types::SessionCmd;
