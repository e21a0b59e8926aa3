use std::env;
use std::path::Path;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::audio::SessionPlayer;
use crate::config::Settings;
use crate::library::{Track, load_manifest, scan};
use crate::mpris::ControlCmd;
use crate::notify::StatusLine;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;

/// Tracks from the first CLI argument: a `.toml` manifest or a directory to scan.
fn load_tracks(arg: &str, settings: &Settings) -> Result<(Vec<Track>, String), Box<dyn std::error::Error>> {
    let path = Path::new(arg);
    let is_manifest = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    if is_manifest {
        let manifest = load_manifest(path)?;
        let label = manifest.name.unwrap_or_else(|| arg.to_string());
        Ok((manifest.tracks, label))
    } else {
        Ok((scan(path, &settings.library), arg.to_string()))
    }
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_problem) = settings::load_settings();
    let log_path = logging::init(&settings);
    info!(log = ?log_path, "miniplay starting");
    if let Some(problem) = config_problem {
        warn!("{problem}");
    }

    let source = env::args().nth(1).unwrap_or_else(|| {
        std::env::current_dir()
            .ok()
            .and_then(|p| p.to_str().map(|s| s.to_string()))
            .unwrap_or_else(|| ".".to_string())
    });

    // Bad manifests fail here, before the terminal is taken over.
    let (tracks, label) = load_tracks(&source, &settings)?;
    info!(tracks = tracks.len(), source = %label, "library loaded");

    let status = StatusLine::new(Duration::from_millis(settings.ui.notice_ttl_ms));
    let player = SessionPlayer::spawn(&settings.audio, Arc::new(status.clone()));

    let mut app = App::new(tracks);
    app.follow_playback = settings.ui.follow_playback;
    app.volume_step = settings.audio.volume_step;
    app.set_source_label(label);
    app.set_playback_handle(player.playback_handle());
    app.set_status_line(status);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result: Result<(), Box<dyn std::error::Error>> = (|| {
        let mut state = event_loop::EventLoopState::default();

        event_loop::run(
            &mut terminal,
            &settings,
            &mut app,
            &player,
            &mpris,
            &control_tx,
            &control_rx,
            &mut state,
        )
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    player.quit();
    info!("miniplay stopped");

    run_result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_argument_loads_a_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Mix.TOML");
        std::fs::write(
            &path,
            r#"
name = "Road trip"

[[tracks]]
id = "1"
name = "Intro"
preview_url = "intro.mp3"
"#,
        )
        .unwrap();

        let (tracks, label) = load_tracks(path.to_str().unwrap(), &Settings::default()).unwrap();
        assert_eq!(label, "Road trip");
        assert_eq!(tracks.len(), 1);
        assert_eq!(
            tracks[0].preview(),
            Some(dir.path().join("intro.mp3").to_str().unwrap())
        );
    }

    #[test]
    fn broken_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "tracks = 3").unwrap();
        assert!(load_tracks(path.to_str().unwrap(), &Settings::default()).is_err());
    }

    #[test]
    fn directory_argument_is_scanned() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.mp3"), b"").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let (tracks, label) = load_tracks(dir.path().to_str().unwrap(), &Settings::default()).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name, "b");
        assert_eq!(label, dir.path().to_str().unwrap());
    }
}
