//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the track list, the
//! selection and the handles playback state is read from.

mod model;

pub use model::*;
