use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use async_io::block_on;
use tracing::{debug, info};

use crate::config::AudioSettings;
use crate::notify::Notifier;
use crate::session::{PlaybackHandle, Session, SessionOptions};

use super::engine::AudioEngine;
use super::rodio_engine::RodioEngine;
use super::types::SessionCmd;

/// Owns the session thread. Commands go in through `send`; state comes back
/// through the shared `PlaybackHandle`.
pub struct SessionPlayer {
    tx: Sender<SessionCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl SessionPlayer {
    /// Start a session on the default output device.
    pub fn spawn(settings: &AudioSettings, notifier: Arc<dyn Notifier>) -> Self {
        let timeout = settings.engine_timeout();
        let options = SessionOptions {
            initial_volume: settings.initial_volume,
            call_timeout: timeout,
        };
        // The output stream has to be opened on the thread that uses it.
        Self::spawn_with(move || RodioEngine::open(timeout), notifier, options)
    }

    /// Start a session around whatever engine `make_engine` builds on the
    /// session thread.
    pub fn spawn_with<E, F>(make_engine: F, notifier: Arc<dyn Notifier>, options: SessionOptions) -> Self
    where
        E: AudioEngine + 'static,
        F: FnOnce() -> E + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<SessionCmd>();
        let playback = PlaybackHandle::default();
        let published = playback.clone();

        let join = thread::Builder::new()
            .name("miniplay-session".into())
            .spawn(move || {
                let session = Session::new(make_engine(), notifier, published, options);
                run_session(&session, rx);
            })
            .map_err(|e| tracing::error!(error = %e, "could not start session thread"))
            .ok();

        Self {
            tx,
            playback,
            join: Mutex::new(join),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn send(&self, cmd: SessionCmd) -> Result<(), mpsc::SendError<SessionCmd>> {
        self.tx.send(cmd)
    }

    /// Stop playback and wait for the session thread to finish.
    pub fn quit(&self) {
        let _ = self.send(SessionCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

fn run_session<E: AudioEngine>(session: &Session<E>, rx: Receiver<SessionCmd>) {
    // Commands run one at a time, in the order they were sent.
    while let Ok(cmd) = rx.recv() {
        debug!(?cmd, "session command");
        match cmd {
            SessionCmd::Play {
                track,
                playlist,
                index,
            } => block_on(session.load_and_play(track, playlist, index)),
            SessionCmd::TogglePlayback => block_on(session.toggle_playback()),
            SessionCmd::SetVolume(v) => block_on(session.set_volume(v)),
            SessionCmd::Next => block_on(session.play_next()),
            SessionCmd::Prev => block_on(session.play_previous()),
            SessionCmd::Stop => block_on(session.stop()),
            SessionCmd::Quit => break,
        }
    }

    block_on(session.stop());
    info!("session thread finished");
}
