//! Share port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::Recording;

/// Share errors
#[derive(Debug, Clone, Error)]
pub enum ShareError {
    #[error("Share target unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to share recording: {0}")]
    Failed(String),
}

/// Port handing a recording to the host's export facility
#[async_trait]
pub trait Share: Send + Sync {
    /// Export the recording's file reference.
    async fn share(&self, recording: &Recording) -> Result<(), ShareError>;
}

/// Blanket implementation for boxed share targets
#[async_trait]
impl Share for Box<dyn Share> {
    async fn share(&self, recording: &Recording) -> Result<(), ShareError> {
        self.as_ref().share(recording).await
    }
}
