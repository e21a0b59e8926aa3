use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_io::Timer;
use futures::future::{self, Either};
use futures::lock::Mutex;
use futures::pin_mut;
use tracing::{debug, info, warn};

use crate::audio::{AudioEngine, EngineError};
use crate::library::Track;
use crate::notify::Notifier;

use super::error::PlaybackError;
use super::types::{PlaybackHandle, PlaybackInfo, PlaybackState, Playlist};

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Starting volume; clamped into `0.0..=1.0`.
    pub initial_volume: f32,
    /// Upper bound for a single engine call. `None` waits forever.
    pub call_timeout: Option<Duration>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            call_timeout: None,
        }
    }
}

/// A handle together with the track it plays. Keeping them in one place is
/// what makes "a track is loaded iff a handle is held" hold.
struct Loaded<H> {
    handle: H,
    track: Track,
}

struct Inner<H> {
    loaded: Option<Loaded<H>>,
    loading: Option<Track>,
    playing: bool,
    volume: f32,
    playlist: Playlist,
    cursor: usize,
}

impl<H> Inner<H> {
    fn state(&self) -> PlaybackState {
        if self.loading.is_some() {
            PlaybackState::Loading
        } else if self.loaded.is_none() {
            PlaybackState::Idle
        } else if self.playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }

    fn snapshot(&self) -> PlaybackInfo {
        PlaybackInfo {
            state: self.state(),
            track: self.loaded.as_ref().map(|l| l.track.clone()),
            loading: self.loading.clone(),
            volume: self.volume,
            playlist: self.playlist.clone(),
            cursor: self.cursor,
        }
    }

    /// Replace the playlist, keeping the cursor inside it.
    fn seed(&mut self, playlist: Playlist, index: usize) {
        self.cursor = if playlist.is_empty() {
            0
        } else {
            index.min(playlist.len() - 1)
        };
        self.playlist = playlist;
    }
}

#[derive(Debug, Copy, Clone)]
enum Step {
    Next,
    Previous,
}

impl Step {
    fn advance(self, cursor: usize, len: usize) -> usize {
        match self {
            Step::Next => (cursor + 1) % len,
            Step::Previous if cursor == 0 => len - 1,
            Step::Previous => cursor - 1,
        }
    }
}

/// `None` for NaN, otherwise `value` clamped into `0.0..=1.0`.
fn clamp_volume(value: f32) -> Option<f32> {
    if value.is_nan() {
        None
    } else {
        Some(value.clamp(0.0, 1.0))
    }
}

/// The playback session.
///
/// Every operation takes the session lock for its whole duration, engine
/// calls included, so operations never interleave: a toggle issued while a
/// load is in flight waits and then acts on the new handle.
pub struct Session<E: AudioEngine> {
    engine: E,
    notifier: Arc<dyn Notifier>,
    call_timeout: Option<Duration>,
    inner: Mutex<Inner<E::Handle>>,
    published: PlaybackHandle,
}

impl<E: AudioEngine> Session<E> {
    pub fn new(
        engine: E,
        notifier: Arc<dyn Notifier>,
        published: PlaybackHandle,
        options: SessionOptions,
    ) -> Self {
        let inner = Inner {
            loaded: None,
            loading: None,
            playing: false,
            volume: clamp_volume(options.initial_volume).unwrap_or(1.0),
            playlist: Arc::from(Vec::new()),
            cursor: 0,
        };
        if let Ok(mut p) = published.lock() {
            *p = inner.snapshot();
        }

        Self {
            engine,
            notifier,
            call_timeout: options.call_timeout,
            inner: Mutex::new(inner),
            published,
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.published.clone()
    }

    /// The latest published snapshot.
    pub fn info(&self) -> PlaybackInfo {
        self.published
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    /// Load `track` and start it.
    ///
    /// With `playlist`, the playlist is replaced and the cursor set to `index`
    /// (default 0). Without it, playlist and cursor are left alone.
    pub async fn load_and_play(&self, track: Track, playlist: Option<Playlist>, index: Option<usize>) {
        let mut inner = self.inner.lock().await;
        if playlist.is_none() && index.is_some() {
            debug!(?index, "index without a playlist ignored");
        }
        let seed = playlist.map(|p| (p, index.unwrap_or(0)));
        if let Err(e) = self.load_locked(&mut inner, track, seed).await {
            self.report(&e);
        }
    }

    /// Pause when playing, resume when paused. Does nothing when idle.
    pub async fn toggle_playback(&self) {
        let mut inner = self.inner.lock().await;
        if inner.loaded.is_none() {
            return;
        }

        // Flip first so the UI reacts immediately; undone below on failure.
        let resume = !inner.playing;
        inner.playing = resume;
        self.publish(&inner);

        let result = match &inner.loaded {
            Some(l) if resume => self.call("play", self.engine.play(&l.handle)).await,
            Some(l) => self.call("pause", self.engine.pause(&l.handle)).await,
            None => Ok(()),
        };

        if let Err(e) = result {
            inner.playing = !resume;
            self.publish(&inner);
            self.report(&e.into());
        } else {
            info!(playing = resume, "playback toggled");
        }
    }

    /// Store `value` clamped to `0.0..=1.0` and apply it to the loaded preview.
    pub async fn set_volume(&self, value: f32) {
        let Some(volume) = clamp_volume(value) else {
            warn!("ignoring NaN volume");
            return;
        };

        let mut inner = self.inner.lock().await;
        inner.volume = volume;
        self.publish(&inner);

        let result = match &inner.loaded {
            Some(l) => {
                self.call("set_volume", self.engine.set_volume(&l.handle, volume))
                    .await
            }
            None => Ok(()),
        };
        if let Err(e) = result {
            self.report(&e.into());
        }
    }

    pub async fn play_next(&self) {
        self.step(Step::Next).await;
    }

    pub async fn play_previous(&self) {
        self.step(Step::Previous).await;
    }

    /// Unload everything. Engine failures are ignored; this always succeeds.
    /// Volume is kept.
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        if let Some(old) = inner.loaded.take() {
            if let Err(e) = self.call("stop", self.engine.stop(&old.handle)).await {
                debug!(error = %e, "stop failed, releasing anyway");
            }
            if let Err(e) = self.call("release", self.engine.release(old.handle)).await {
                debug!(error = %e, "release failed");
            }
            info!(track = %old.track.name, "session stopped");
        }

        inner.loading = None;
        inner.playing = false;
        inner.playlist = Arc::from(Vec::new());
        inner.cursor = 0;
        self.publish(&inner);
    }

    async fn step(&self, step: Step) {
        let mut inner = self.inner.lock().await;
        let len = inner.playlist.len();
        if len == 0 {
            self.report(&PlaybackError::EmptyPlaylist);
            return;
        }

        let target = step.advance(inner.cursor, len);
        let playlist = inner.playlist.clone();
        let track = playlist[target].clone();
        debug!(?step, from = inner.cursor, to = target, "stepping playlist");

        if let Err(e) = self
            .load_locked(&mut inner, track, Some((playlist, target)))
            .await
        {
            self.report(&e);
        }
    }

    async fn load_locked(
        &self,
        inner: &mut Inner<E::Handle>,
        track: Track,
        seed: Option<(Playlist, usize)>,
    ) -> Result<(), PlaybackError> {
        let Some(url) = track.preview().map(str::to_owned) else {
            return Err(PlaybackError::NoPreview(track.name.clone()));
        };

        // The old handle goes first; a failed release must not block the new load.
        if let Some(old) = inner.loaded.take() {
            inner.playing = false;
            if let Err(e) = self.call("release", self.engine.release(old.handle)).await {
                warn!(error = %e, track = %old.track.name, "release failed, continuing");
            }
        }

        inner.loading = Some(track.clone());
        self.publish(inner);

        let started = self.start(&url, inner.volume).await;
        inner.loading = None;

        match started {
            Ok(handle) => {
                info!(track = %track.name, url = %url, "preview playing");
                inner.loaded = Some(Loaded { handle, track });
                inner.playing = true;
                if let Some((playlist, index)) = seed {
                    inner.seed(playlist, index);
                }
                self.publish(inner);
                Ok(())
            }
            Err(e) => {
                self.publish(inner);
                Err(e.into())
            }
        }
    }

    /// Acquire, set volume, play. A handle that fails to start is released
    /// before the error is returned.
    async fn start(&self, url: &str, volume: f32) -> Result<E::Handle, EngineError> {
        let handle = self.call("acquire", self.engine.acquire(url)).await?;

        let started = async {
            self.call("set_volume", self.engine.set_volume(&handle, volume))
                .await?;
            self.call("play", self.engine.play(&handle)).await
        }
        .await;

        match started {
            Ok(()) => Ok(handle),
            Err(e) => {
                if let Err(release_err) = self.call("release", self.engine.release(handle)).await {
                    debug!(error = %release_err, "release of half-started handle failed");
                }
                Err(e)
            }
        }
    }

    /// Run one engine call under the configured timeout.
    async fn call<T>(
        &self,
        op: &'static str,
        fut: impl Future<Output = Result<T, EngineError>>,
    ) -> Result<T, EngineError> {
        debug!(op, "engine call");
        let Some(limit) = self.call_timeout else {
            return fut.await;
        };

        let timer = Timer::after(limit);
        pin_mut!(fut);
        match future::select(fut, timer).await {
            Either::Left((result, _)) => result,
            Either::Right(_) => Err(EngineError::TimedOut { op, after: limit }),
        }
    }

    fn publish(&self, inner: &Inner<E::Handle>) {
        if let Ok(mut p) = self.published.lock() {
            *p = inner.snapshot();
        }
    }

    fn report(&self, err: &PlaybackError) {
        let notice = err.notice();
        warn!(error = %err, "{}", notice.title());
        self.notifier.warn(notice.title(), &notice.message());
    }
}
