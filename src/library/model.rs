use serde::Deserialize;

/// A playable (or at least listable) track.
///
/// `preview_url` is optional: catalogs routinely carry tracks without a
/// preview, and the session reports those instead of loading them.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: String,
    #[serde(default, alias = "imageUrl")]
    pub image_url: String,
    #[serde(default, alias = "previewUrl")]
    pub preview_url: Option<String>,
}

impl Track {
    /// The preview URL, treating blank strings as missing.
    pub fn preview(&self) -> Option<&str> {
        self.preview_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }

    /// `Artists - Name`, or just the name when no artists are known.
    pub fn display(&self) -> String {
        match self.artists.trim() {
            "" => self.name.clone(),
            a => format!("{} - {}", a, self.name),
        }
    }
}
