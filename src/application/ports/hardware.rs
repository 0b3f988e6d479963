//! Hardware audio session port

use thiserror::Error;

use crate::domain::session::AudioMode;

/// Errors configuring the hardware audio session
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("No audio device available for {0}")]
    NoDevice(AudioMode),

    #[error("Audio session configuration failed: {0}")]
    Configuration(String),

    #[error("Audio session is already active for {active}")]
    Busy { active: AudioMode },

    #[error("Audio session is not active")]
    NotActive,
}

/// Port for the platform's shared audio hardware.
///
/// Implementations are not expected to guard against concurrent use;
/// the session manager serialises access.
pub trait AudioHardware: Send + Sync {
    /// Configure the hardware for exclusive use in `mode`.
    fn configure(&self, mode: AudioMode) -> Result<(), SessionError>;

    /// Release exclusive use previously configured for `mode`.
    fn release(&self, mode: AudioMode) -> Result<(), SessionError>;
}
