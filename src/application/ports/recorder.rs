//! Capture port interface

use std::path::Path;

use async_trait::async_trait;

use super::stream::{ActiveStream, StreamError};
use crate::domain::recording::EncodingSettings;

/// Port for writing microphone audio to a file
#[async_trait]
pub trait CaptureBackend: Send + Sync {
    /// Start capturing into `destination`.
    ///
    /// # Arguments
    /// * `destination` - A file path that must not exist yet
    /// * `settings` - Encoding parameters for the file
    ///
    /// # Returns
    /// A handle to the running stream, or the reason it could not start
    async fn start(
        &self,
        destination: &Path,
        settings: &EncodingSettings,
    ) -> Result<ActiveStream, StreamError>;
}
