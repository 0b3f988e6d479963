//! Errors surfaced by the recorder and player use cases

use thiserror::Error;

use super::ports::{SessionError, StreamError};
use crate::domain::session::InvalidStateTransition;

/// Errors from starting or stopping an audio stream
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("{0}")]
    Session(#[from] SessionError),

    #[error("{0}")]
    Stream(#[from] StreamError),

    #[error("{0}")]
    InvalidState(#[from] InvalidStateTransition),
}
