//! Errors surfaced by console and one-shot commands

use thiserror::Error;

use crate::application::ports::{ShareError, StoreError};
use crate::application::AudioError;
use crate::domain::session::AudioMode;

/// Failure of a user command; shown verbatim
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Share(#[from] ShareError),

    #[error("{mode} stream failed: {reason}")]
    StreamFailed { mode: AudioMode, reason: String },

    #[error("No recording matches {0}")]
    UnknownRecording(String),

    #[error("Nothing is recording or playing")]
    NothingToStop,

    #[error("Unknown command '{0}'. Type 'help' for a list of commands")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Failed to listen for signals: {0}")]
    Signal(String),

    #[error("Failed to write output: {0}")]
    Output(String),
}
