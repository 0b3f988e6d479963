//! Clipboard share adapter using arboard
//!
//! Works on Windows, macOS, and Linux (X11/Wayland).

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::application::ports::{Share, ShareError};
use crate::domain::recording::Recording;

/// Share target that copies a recording's path to the clipboard
pub struct ArboardShare;

impl ArboardShare {
    /// Create a new arboard share adapter
    pub fn new() -> Self {
        Self
    }
}

impl Default for ArboardShare {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the path placed on the clipboard
fn shared_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[async_trait]
impl Share for ArboardShare {
    async fn share(&self, recording: &Recording) -> Result<(), ShareError> {
        if !recording.path().exists() {
            return Err(ShareError::Failed(format!(
                "{} no longer exists",
                recording.file_name()
            )));
        }
        let text = shared_path(recording.path()).display().to_string();

        // arboard operations are blocking, so run in spawn_blocking
        tokio::task::spawn_blocking(move || {
            let mut clipboard = arboard::Clipboard::new()
                .map_err(|e| ShareError::Unavailable(e.to_string()))?;

            clipboard
                .set_text(text)
                .map_err(|e| ShareError::Failed(e.to_string()))
        })
        .await
        .map_err(|e| ShareError::Failed(format!("Task join error: {}", e)))?
    }
}
