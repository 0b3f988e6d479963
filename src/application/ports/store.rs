//! Recording store port interface

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::error::InvalidRecordingName;
use crate::domain::recording::Recording;

/// Recording store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Recording not found: {0}")]
    NotFound(String),

    #[error("A recording named \"{0}\" already exists")]
    NameCollision(String),

    #[error(transparent)]
    InvalidName(#[from] InvalidRecordingName),

    #[error("File system error: {0}")]
    Io(String),
}

/// Port for the directory holding recording files
#[async_trait]
pub trait RecordingStore: Send + Sync {
    /// List recordings, newest first.
    ///
    /// A missing or empty directory yields an empty list.
    async fn list(&self) -> Result<Vec<Recording>, StoreError>;

    /// Remove a recording's file.
    async fn delete(&self, recording: &Recording) -> Result<(), StoreError>;

    /// Rename a recording, keeping its extension.
    ///
    /// # Returns
    /// The recording under its new name
    async fn rename(&self, recording: &Recording, new_base_name: &str)
        -> Result<Recording, StoreError>;

    /// Reserve the destination path for a new recording file.
    async fn allocate(&self, file_name: &str) -> Result<PathBuf, StoreError>;
}
