use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::model::Track;

#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read playlist {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid playlist {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A playlist file.
///
/// ```toml
/// name = "Evening"
///
/// [[tracks]]
/// id = "4uLU6hMCjMI75M1A2tKUQC"
/// name = "Never Gonna Give You Up"
/// artists = "Rick Astley"
/// image_url = "https://example.com/cover.jpg"
/// preview_url = "https://example.com/preview.mp3"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

fn is_url(s: &str) -> bool {
    s.contains("://")
}

/// Parse a manifest from TOML text. Relative local previews are resolved
/// against `base`.
pub fn parse_manifest(text: &str, base: &Path) -> Result<Manifest, toml::de::Error> {
    let mut manifest: Manifest = toml::from_str(text)?;
    for track in &mut manifest.tracks {
        let Some(url) = track.preview_url.as_deref() else {
            continue;
        };
        if !is_url(url) && Path::new(url).is_relative() && !url.trim().is_empty() {
            track.preview_url = Some(base.join(url).display().to_string());
        }
    }
    Ok(manifest)
}

/// Load a playlist manifest from disk.
pub fn load_manifest(path: &Path) -> Result<Manifest, LibraryError> {
    let text = fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    parse_manifest(&text, base).map_err(|source| LibraryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
