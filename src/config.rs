//! Settings for the player: audio, UI, library scanning and logging.
//!
//! `Settings::load` layers an optional TOML file under `MINIPLAY__*`
//! environment variables; anything missing keeps its default.

mod load;
mod schema;

pub use schema::*;
