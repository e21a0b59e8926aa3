use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::audio::{SessionCmd, SessionPlayer};
use crate::config;
use crate::mpris::{ControlCmd, MprisHandle};
use crate::runtime::mpris_sync::MprisSync;
use crate::session::{PlaybackInfo, PlaybackState};
use crate::ui;

/// State tracked by the runtime event loop across iterations.
#[derive(Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    pub mpris: MprisSync,
}

/// What the loop should do after a key or a control command.
#[derive(Debug)]
enum Action {
    Session(SessionCmd),
    Control(ControlCmd),
    Quit,
    None,
}

/// Main terminal event loop: handles input, UI drawing, sync with the
/// session thread and MPRIS. Returns `Ok(())` when shutdown is requested.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    player: &SessionPlayer,
    mpris: &MprisHandle,
    control_tx: &mpsc::Sender<ControlCmd>,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let info = app.playback();
        app.sync_follow(&info);
        app.sync_volume(&info);
        state.mpris.sync(mpris, &info);

        terminal.draw(|f| ui::draw(f, app, &settings.ui))?;

        while let Ok(cmd) = control_rx.try_recv() {
            let info = app.playback();
            if dispatch(control_action(cmd, &info, app), player, control_tx) {
                return Ok(());
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if dispatch(key_action(key, app, state), player, control_tx) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Carry out `action`. Returns true when the loop should end.
fn dispatch(action: Action, player: &SessionPlayer, control_tx: &mpsc::Sender<ControlCmd>) -> bool {
    match action {
        Action::Session(cmd) => {
            debug!(?cmd, "to session");
            let _ = player.send(cmd);
        }
        Action::Control(cmd) => {
            let _ = control_tx.send(cmd);
        }
        Action::Quit => return true,
        Action::None => {}
    }
    false
}

fn control_action(cmd: ControlCmd, info: &PlaybackInfo, app: &mut App) -> Action {
    match cmd {
        ControlCmd::Quit => Action::Quit,
        ControlCmd::Play => match info.state {
            PlaybackState::Paused => Action::Session(SessionCmd::TogglePlayback),
            PlaybackState::Idle => play_selected(app),
            PlaybackState::Loading | PlaybackState::Playing => Action::None,
        },
        ControlCmd::Pause => match info.state {
            PlaybackState::Playing => Action::Session(SessionCmd::TogglePlayback),
            _ => Action::None,
        },
        ControlCmd::PlayPause => match info.state {
            PlaybackState::Idle => play_selected(app),
            _ => Action::Session(SessionCmd::TogglePlayback),
        },
        ControlCmd::Stop => Action::Session(SessionCmd::Stop),
        ControlCmd::Next => {
            app.follow_playback_on();
            Action::Session(SessionCmd::Next)
        }
        ControlCmd::Prev => {
            app.follow_playback_on();
            Action::Session(SessionCmd::Prev)
        }
        ControlCmd::SetVolume(v) => {
            let v = v as f32;
            app.note_volume_target(v);
            Action::Session(SessionCmd::SetVolume(v))
        }
    }
}

fn play_selected(app: &mut App) -> Action {
    app.play_selected().map_or(Action::None, Action::Session)
}

fn key_action(key: KeyEvent, app: &mut App, state: &mut EventLoopState) -> Action {
    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback_off();
                app.first();
            } else {
                state.pending_gg = true;
            }
            Action::None
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.last();
            Action::None
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.next();
            Action::None
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.prev();
            Action::None
        }
        KeyCode::Enter => play_selected(app),
        // Behave like MPRIS PlayPause.
        KeyCode::Char('p') | KeyCode::Char(' ') => Action::Control(ControlCmd::PlayPause),
        KeyCode::Char('l') => Action::Control(ControlCmd::Next),
        KeyCode::Char('h') => Action::Control(ControlCmd::Prev),
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Session(app.volume_by(1.0)),
        KeyCode::Char('-') => Action::Session(app.volume_by(-1.0)),
        KeyCode::Char('x') => Action::Control(ControlCmd::Stop),
        KeyCode::Esc => {
            app.dismiss_notice();
            Action::None
        }
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::library::Track;
    use crate::notify::{Notifier, StatusLine};

    fn t(name: &str) -> Track {
        Track {
            id: name.into(),
            name: name.into(),
            artists: String::new(),
            image_url: String::new(),
            preview_url: Some(format!("https://cdn.example/{name}.mp3")),
        }
    }

    fn app() -> App {
        App::new(vec![t("a"), t("b"), t("c")])
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn info(state: PlaybackState) -> PlaybackInfo {
        PlaybackInfo {
            state,
            ..PlaybackInfo::default()
        }
    }

    #[test]
    fn play_pause_starts_the_selection_when_idle() {
        let mut app = app();
        app.set_selected(2);
        match control_action(ControlCmd::PlayPause, &info(PlaybackState::Idle), &mut app) {
            Action::Session(SessionCmd::Play {
                track,
                playlist,
                index,
            }) => {
                assert_eq!(track.name, "c");
                assert!(Arc::ptr_eq(&playlist.unwrap(), &app.tracks));
                assert_eq!(index, Some(2));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn play_pause_toggles_once_something_is_loaded() {
        let mut app = app();
        for state in [
            PlaybackState::Playing,
            PlaybackState::Paused,
            PlaybackState::Loading,
        ] {
            assert!(matches!(
                control_action(ControlCmd::PlayPause, &info(state), &mut app),
                Action::Session(SessionCmd::TogglePlayback)
            ));
        }
    }

    #[test]
    fn play_and_pause_only_act_in_the_matching_state() {
        let mut app = app();
        assert!(matches!(
            control_action(ControlCmd::Play, &info(PlaybackState::Playing), &mut app),
            Action::None
        ));
        assert!(matches!(
            control_action(ControlCmd::Pause, &info(PlaybackState::Paused), &mut app),
            Action::None
        ));
        assert!(matches!(
            control_action(ControlCmd::Pause, &info(PlaybackState::Playing), &mut app),
            Action::Session(SessionCmd::TogglePlayback)
        ));
    }

    #[test]
    fn mpris_volume_is_passed_through() {
        let mut app = app();
        match control_action(
            ControlCmd::SetVolume(1.5),
            &info(PlaybackState::Idle),
            &mut app,
        ) {
            Action::Session(SessionCmd::SetVolume(v)) => assert_eq!(v, 1.5),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(app.volume_target, Some(1.0));

        match key_action(key('-'), &mut app, &mut EventLoopState::default()) {
            Action::Session(SessionCmd::SetVolume(v)) => assert!((v - 0.95).abs() < 1e-6),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn gg_needs_two_presses() {
        let mut app = app();
        let mut state = EventLoopState::default();
        app.last();

        key_action(key('g'), &mut app, &mut state);
        assert_eq!(app.selected, 2);
        key_action(key('g'), &mut app, &mut state);
        assert_eq!(app.selected, 0);

        app.last();
        key_action(key('g'), &mut app, &mut state);
        key_action(key('j'), &mut app, &mut state);
        key_action(key('g'), &mut app, &mut state);
        assert_eq!(app.selected, 0, "j wraps from the bottom, g alone does nothing");
        assert!(state.pending_gg);
    }

    #[test]
    fn movement_turns_follow_off() {
        let mut app = app();
        let mut state = EventLoopState::default();
        key_action(key('j'), &mut app, &mut state);
        assert!(!app.follow_playback);
        assert_eq!(app.selected, 1);
    }

    #[test]
    fn transport_keys_go_through_the_control_channel() {
        let mut app = app();
        let mut state = EventLoopState::default();
        for (c, want) in [
            (' ', ControlCmd::PlayPause),
            ('p', ControlCmd::PlayPause),
            ('l', ControlCmd::Next),
            ('h', ControlCmd::Prev),
            ('x', ControlCmd::Stop),
        ] {
            match key_action(key(c), &mut app, &mut state) {
                Action::Control(got) => assert_eq!(got, want),
                other => panic!("{c}: unexpected {other:?}"),
            }
        }
        assert!(matches!(
            key_action(key('q'), &mut app, &mut state),
            Action::Quit
        ));
    }

    #[test]
    fn volume_keys_add_up_from_the_last_volume_sent() {
        let mut app = app();
        let mut state = EventLoopState::default();
        match key_action(key('-'), &mut app, &mut state) {
            Action::Session(SessionCmd::SetVolume(v)) => assert!((v - 0.95).abs() < 1e-6),
            other => panic!("unexpected {other:?}"),
        }
        match key_action(key('-'), &mut app, &mut state) {
            Action::Session(SessionCmd::SetVolume(v)) => assert!((v - 0.9).abs() < 1e-6),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn escape_dismisses_the_notice() {
        let mut app = app();
        let mut state = EventLoopState::default();
        let status = StatusLine::new(Duration::from_secs(5));
        app.set_status_line(status.clone());
        status.warn("No preview", "\"b\" has no preview available.");
        assert!(app.notice().is_some());

        assert!(matches!(
            key_action(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), &mut app, &mut state),
            Action::None
        ));
        assert_eq!(app.notice(), None);
    }

    #[test]
    fn next_and_prev_resume_following() {
        let mut app = app();
        app.set_selected(2);
        app.play_selected();
        for cmd in [ControlCmd::Next, ControlCmd::Prev] {
            app.follow_playback_off();
            control_action(cmd, &info(PlaybackState::Playing), &mut app);
            assert!(app.follow_playback);
            assert_eq!(app.pending_follow_index, None);
        }
    }
}
