//! Where preview bytes come from.
//!
//! A preview URL is either remote (`http://`, `https://`) or local (a
//! `file://` URL or a plain path). Both end up as an in-memory buffer that
//! rodio can decode and seek.

use std::fs;
use std::path::PathBuf;

use super::engine::EngineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(String),
    Local(PathBuf),
}

/// Classify a preview URL.
pub fn locate(url: &str) -> Location {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Location::Remote(url.to_string())
    } else if lower.starts_with("file://") {
        Location::Local(PathBuf::from(&url["file://".len()..]))
    } else {
        Location::Local(PathBuf::from(url))
    }
}

/// Read the whole preview into memory. Blocking; run it off the session thread.
pub fn fetch(location: &Location, client: &reqwest::blocking::Client) -> Result<Vec<u8>, EngineError> {
    match location {
        Location::Remote(url) => {
            let fail = |e: reqwest::Error| EngineError::Fetch {
                url: url.clone(),
                reason: e.to_string(),
            };
            let resp = client.get(url).send().map_err(fail)?;
            let resp = resp.error_for_status().map_err(fail)?;
            let bytes = resp.bytes().map_err(fail)?;
            Ok(bytes.to_vec())
        }
        Location::Local(path) => fs::read(path).map_err(|e| EngineError::Fetch {
            url: path.display().to_string(),
            reason: e.to_string(),
        }),
    }
}
