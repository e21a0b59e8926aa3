use std::thread;
use std::time::Duration;

use async_trait::async_trait;
use futures::channel::oneshot;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::debug;

use super::engine::{AudioEngine, EngineError};
use super::sink::create_sink;
use super::source::{fetch, locate};

/// One loaded preview.
pub struct RodioHandle {
    sink: Sink,
    url: String,
}

impl std::fmt::Debug for RodioHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioHandle").field("url", &self.url).finish()
    }
}

/// `AudioEngine` on top of the default rodio output stream.
///
/// The stream is not `Send` on every platform, so the engine must live on the
/// thread that opened it. Fetching happens on short-lived loader threads.
pub struct RodioEngine {
    stream: Option<OutputStream>,
    client: reqwest::blocking::Client,
}

impl RodioEngine {
    /// Open the default output device. Without one the engine still exists,
    /// but every `acquire` fails with `EngineError::NoOutput`.
    pub fn open(fetch_timeout: Option<Duration>) -> Self {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when the stream is dropped, which would
                // scribble over the TUI.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                tracing::error!(error = %e, "no audio output device");
                None
            }
        };

        let mut builder = reqwest::blocking::Client::builder();
        if let Some(t) = fetch_timeout {
            builder = builder.timeout(t);
        }
        let client = builder.build().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "custom http client failed, using defaults");
            reqwest::blocking::Client::new()
        });

        Self { stream, client }
    }
}

#[async_trait(?Send)]
impl AudioEngine for RodioEngine {
    type Handle = RodioHandle;

    async fn acquire(&self, url: &str) -> Result<RodioHandle, EngineError> {
        let Some(stream) = self.stream.as_ref() else {
            return Err(EngineError::NoOutput("output stream is not open".into()));
        };

        let location = locate(url);
        let client = self.client.clone();
        let (tx, rx) = oneshot::channel();
        thread::spawn(move || {
            let _ = tx.send(fetch(&location, &client));
        });

        let bytes = rx.await.map_err(|_| EngineError::Disconnected)??;
        debug!(url, bytes = bytes.len(), "preview fetched");

        let sink = create_sink(stream, url, bytes)?;
        Ok(RodioHandle {
            sink,
            url: url.to_string(),
        })
    }

    async fn play(&self, handle: &RodioHandle) -> Result<(), EngineError> {
        handle.sink.play();
        Ok(())
    }

    async fn pause(&self, handle: &RodioHandle) -> Result<(), EngineError> {
        handle.sink.pause();
        Ok(())
    }

    async fn stop(&self, handle: &RodioHandle) -> Result<(), EngineError> {
        handle.sink.stop();
        Ok(())
    }

    async fn set_volume(&self, handle: &RodioHandle, volume: f32) -> Result<(), EngineError> {
        handle.sink.set_volume(volume);
        Ok(())
    }

    async fn release(&self, handle: RodioHandle) -> Result<(), EngineError> {
        handle.sink.stop();
        debug!(url = %handle.url, "preview released");
        Ok(())
    }
}
