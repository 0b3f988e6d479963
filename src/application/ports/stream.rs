//! Stream handles shared by the capture and playback ports
//!
//! A backend hands back an [`ActiveStream`] once its stream is running and
//! keeps the matching [`StreamLink`]. The link reports exactly one
//! [`StreamEnd`] per stream, whether the caller stopped it or it ended
//! on its own.

use std::fmt;

use thiserror::Error;
use tokio::sync::oneshot;

/// Errors raised synchronously while starting a stream
#[derive(Debug, Clone, Error)]
pub enum StreamError {
    #[error("Failed to start stream: {0}")]
    StartFailed(String),

    #[error("FFmpeg not found. Please install ffmpeg to record audio.")]
    FfmpegNotFound,

    #[error("Destination already exists: {0}")]
    DestinationExists(String),

    #[error("Audio file not found: {0}")]
    SourceNotFound(String),

    #[error("Cannot decode audio file {path}: {reason}")]
    Undecodable { path: String, reason: String },

    #[error("No audio output available: {0}")]
    OutputUnavailable(String),
}

/// How a stream ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEnd {
    /// The caller asked the stream to stop
    Stopped,
    /// The stream ran to its natural end
    Completed,
    /// The stream failed while running
    Failed(String),
}

impl StreamEnd {
    /// Check if the stream ended with a runtime failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for StreamEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Completed => write!(f, "completed"),
            Self::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// Caller side of a stop request
#[derive(Debug)]
pub struct StopHandle {
    sender: Option<oneshot::Sender<()>>,
}

impl StopHandle {
    /// Ask the stream to stop. Later calls do nothing.
    pub fn request_stop(&mut self) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(());
        }
    }
}

/// Caller side of a running stream
#[derive(Debug)]
pub struct ActiveStream {
    pub stop: StopHandle,
    pub finished: oneshot::Receiver<StreamEnd>,
}

/// Backend side of a running stream
#[derive(Debug)]
pub struct StreamLink {
    /// Resolves when a stop is requested or the caller drops its handle
    pub stop: oneshot::Receiver<()>,
    /// Receives the one terminal outcome of the stream
    pub finished: oneshot::Sender<StreamEnd>,
}

/// Create a connected stream handle pair
pub fn stream_channel() -> (ActiveStream, StreamLink) {
    let (stop_tx, stop_rx) = oneshot::channel();
    let (finished_tx, finished_rx) = oneshot::channel();

    (
        ActiveStream {
            stop: StopHandle {
                sender: Some(stop_tx),
            },
            finished: finished_rx,
        },
        StreamLink {
            stop: stop_rx,
            finished: finished_tx,
        },
    )
}
