use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device: {0}")]
    NoOutput(String),
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("failed to decode {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("{op} timed out after {after:?}")]
    TimedOut { op: &'static str, after: Duration },
    #[error("audio engine went away")]
    Disconnected,
}

/// Platform audio as the session sees it: one decoded stream per handle.
///
/// Every call may suspend. Handles are owned by the caller and given back
/// through `release`; the engine never keeps one alive on its own.
#[async_trait(?Send)]
pub trait AudioEngine {
    type Handle;

    /// Open and decode the stream at `url`. The handle starts paused.
    async fn acquire(&self, url: &str) -> Result<Self::Handle, EngineError>;

    async fn play(&self, handle: &Self::Handle) -> Result<(), EngineError>;

    async fn pause(&self, handle: &Self::Handle) -> Result<(), EngineError>;

    async fn stop(&self, handle: &Self::Handle) -> Result<(), EngineError>;

    async fn set_volume(&self, handle: &Self::Handle, volume: f32) -> Result<(), EngineError>;

    async fn release(&self, handle: Self::Handle) -> Result<(), EngineError>;
}
