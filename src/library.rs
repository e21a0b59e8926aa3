//! Track data sources.
//!
//! Tracks come either from scanning a local directory (each file is its own
//! preview) or from a TOML playlist manifest pointing at remote previews.

mod display;
mod manifest;
mod model;
mod scan;

pub use display::now_playing_text;
pub use manifest::{LibraryError, load_manifest};
pub use model::Track;
pub use scan::scan;

#[cfg(test)]
mod tests;
