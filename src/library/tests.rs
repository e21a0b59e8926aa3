use super::display::now_playing_text;
use super::manifest::parse_manifest;
use super::*;
use crate::config::TrackField;
use std::path::Path;

fn t(name: &str, artists: &str) -> Track {
    Track {
        id: format!("id-{name}"),
        name: name.into(),
        artists: artists.into(),
        image_url: String::new(),
        preview_url: None,
    }
}

#[test]
fn now_playing_text_follows_field_order() {
    let track = t("Song", "Artist");
    assert_eq!(
        now_playing_text(&track, &[TrackField::Artists, TrackField::Name], " - "),
        "Artist - Song"
    );
    assert_eq!(
        now_playing_text(&track, &[TrackField::Name, TrackField::Id], " | "),
        "Song | id-Song"
    );
}

#[test]
fn now_playing_text_skips_blank_fields_and_falls_back_to_name() {
    let track = t("Song", "   ");
    assert_eq!(
        now_playing_text(&track, &[TrackField::Artists, TrackField::Name], " - "),
        "Song"
    );
    assert_eq!(now_playing_text(&track, &[], " - "), "Song");
}

#[test]
fn preview_treats_blank_url_as_missing() {
    let mut track = t("Song", "Artist");
    assert_eq!(track.preview(), None);
    track.preview_url = Some("  ".into());
    assert_eq!(track.preview(), None);
    track.preview_url = Some("https://cdn.example/p.mp3".into());
    assert_eq!(track.preview(), Some("https://cdn.example/p.mp3"));
}

#[test]
fn parse_manifest_reads_tracks_and_camel_case_aliases() {
    let text = r#"
name = "Evening"

[[tracks]]
id = "1"
name = "First"
artists = "Band"
imageUrl = "https://img.example/1.jpg"
previewUrl = "https://cdn.example/1.mp3"

[[tracks]]
id = "2"
name = "No preview"
"#;

    let m = parse_manifest(text, Path::new("/music")).unwrap();
    assert_eq!(m.name.as_deref(), Some("Evening"));
    assert_eq!(m.tracks.len(), 2);
    assert_eq!(m.tracks[0].image_url, "https://img.example/1.jpg");
    assert_eq!(
        m.tracks[0].preview_url.as_deref(),
        Some("https://cdn.example/1.mp3")
    );
    assert_eq!(m.tracks[1].artists, "");
    assert_eq!(m.tracks[1].preview_url, None);
}

#[test]
fn parse_manifest_resolves_relative_local_previews() {
    let text = r#"
[[tracks]]
id = "a"
name = "Local"
preview_url = "clips/a.mp3"

[[tracks]]
id = "b"
name = "Absolute"
preview_url = "/srv/b.mp3"

[[tracks]]
id = "c"
name = "File url"
preview_url = "file:///srv/c.mp3"
"#;

    let m = parse_manifest(text, Path::new("/music")).unwrap();
    assert_eq!(
        m.tracks[0].preview_url.as_deref(),
        Some(Path::new("/music").join("clips/a.mp3").display().to_string().as_str())
    );
    assert_eq!(m.tracks[1].preview_url.as_deref(), Some("/srv/b.mp3"));
    assert_eq!(m.tracks[2].preview_url.as_deref(), Some("file:///srv/c.mp3"));
}

#[test]
fn load_manifest_reports_missing_file_and_bad_toml() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nope.toml");
    assert!(matches!(
        load_manifest(&missing),
        Err(LibraryError::Io { .. })
    ));

    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "[[tracks]]\nname = 3\n").unwrap();
    assert!(matches!(load_manifest(&bad), Err(LibraryError::Parse { .. })));
}

#[test]
fn load_manifest_resolves_against_manifest_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("list.toml");
    std::fs::write(
        &path,
        "[[tracks]]\nid = \"x\"\nname = \"X\"\npreview_url = \"x.ogg\"\n",
    )
    .unwrap();

    let m = load_manifest(&path).unwrap();
    assert_eq!(
        m.tracks[0].preview_url.as_deref(),
        Some(dir.path().join("x.ogg").display().to_string().as_str())
    );
}
