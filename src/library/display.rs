use crate::config::TrackField;

use super::model::Track;

/// Build the mini-player line for `track` from the configured `fields`.
///
/// Blank fields are skipped; if nothing is left the track name is used.
pub fn now_playing_text(track: &Track, fields: &[TrackField], sep: &str) -> String {
    let parts: Vec<&str> = fields
        .iter()
        .map(|f| match f {
            TrackField::Name => track.name.trim(),
            TrackField::Artists => track.artists.trim(),
            TrackField::Id => track.id.trim(),
        })
        .filter(|s| !s.is_empty())
        .collect();

    if parts.is_empty() {
        track.name.clone()
    } else {
        parts.join(sep)
    }
}
