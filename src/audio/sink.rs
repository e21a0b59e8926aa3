//! Utilities for turning preview bytes into `rodio` sinks.
//!
//! The helper here decodes an in-memory preview and prepares a paused
//! `Sink` on the output mixer.

use std::io::Cursor;

use rodio::{Decoder, OutputStream, Sink};

use super::engine::EngineError;

/// Create a paused `Sink` playing `bytes`. `url` is only used for errors.
pub(super) fn create_sink(stream: &OutputStream, url: &str, bytes: Vec<u8>) -> Result<Sink, EngineError> {
    let source = Decoder::new(Cursor::new(bytes)).map_err(|e| EngineError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(sink)
}
