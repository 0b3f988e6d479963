//! Playback port interface

use std::path::Path;

use async_trait::async_trait;

use super::stream::{ActiveStream, StreamError};

/// Port for playing an audio file to the default output
#[async_trait]
pub trait PlaybackBackend: Send + Sync {
    /// Start playing `source`.
    ///
    /// Fails before returning if `source` is missing or cannot be decoded.
    async fn play(&self, source: &Path) -> Result<ActiveStream, StreamError>;
}
