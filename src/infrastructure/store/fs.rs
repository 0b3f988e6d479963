//! Local directory recording store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use crate::application::ports::{RecordingStore, StoreError};
use crate::domain::recording::{sort_newest_first, Recording};

/// Recording store backed by one flat directory
pub struct FsRecordingStore {
    dir: PathBuf,
}

impl FsRecordingStore {
    /// Create a store over `dir`. The directory is created lazily.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the recordings
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn io_error(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io(format!("{}: {}", path.display(), e))
}

/// Check for an existing entry without following a dangling symlink into an error
async fn entry_exists(path: &Path) -> Result<bool, StoreError> {
    match fs::symlink_metadata(path).await {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error(path, e)),
    }
}

#[async_trait]
impl RecordingStore for FsRecordingStore {
    async fn list(&self) -> Result<Vec<Recording>, StoreError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.dir, e)),
        };

        let mut recordings = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.dir, e))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(recording) = Recording::from_path(entry.path()) {
                recordings.push(recording);
            }
        }

        sort_newest_first(&mut recordings);
        Ok(recordings)
    }

    async fn delete(&self, recording: &Recording) -> Result<(), StoreError> {
        fs::remove_file(recording.path())
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StoreError::NotFound(recording.file_name().to_string()),
                _ => io_error(recording.path(), e),
            })?;

        debug!(file = recording.file_name(), "deleted recording");
        Ok(())
    }

    async fn rename(
        &self,
        recording: &Recording,
        new_base_name: &str,
    ) -> Result<Recording, StoreError> {
        let file_name = Recording::renamed_file_name(new_base_name)?;
        let parent = recording.path().parent().unwrap_or(&self.dir);
        let target = parent.join(&file_name);

        if !entry_exists(recording.path()).await? {
            return Err(StoreError::NotFound(recording.file_name().to_string()));
        }
        if entry_exists(&target).await? {
            return Err(StoreError::NameCollision(new_base_name.to_string()));
        }

        fs::rename(recording.path(), &target)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => StoreError::NotFound(recording.file_name().to_string()),
                _ => io_error(recording.path(), e),
            })?;

        debug!(from = recording.file_name(), to = %file_name, "renamed recording");
        Recording::from_path(target).ok_or_else(|| StoreError::Io(file_name))
    }

    async fn allocate(&self, file_name: &str) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;

        let path = self.dir.join(file_name);
        if entry_exists(&path).await? {
            return Err(StoreError::NameCollision(file_name.to_string()));
        }
        Ok(path)
    }
}
