//! State-change notifications published by the recorder and the player
//!
//! Events are emitted while the shared session lock is held, so a
//! receiver observes transitions in the order they happened.

use std::path::PathBuf;

use tokio::sync::mpsc;

use super::ports::StreamEnd;
use crate::domain::session::AudioMode;

/// A transport state change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// A recording or playback stream is now running
    Started { mode: AudioMode, path: PathBuf },
    /// The stream ended and the session is idle again
    Finished {
        mode: AudioMode,
        path: PathBuf,
        end: StreamEnd,
    },
}

impl AudioEvent {
    /// Mode of the stream this event is about
    pub fn mode(&self) -> AudioMode {
        match self {
            Self::Started { mode, .. } | Self::Finished { mode, .. } => *mode,
        }
    }
}

/// Sending side of the event channel
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    sender: Option<mpsc::UnboundedSender<AudioEvent>>,
}

impl EventSink {
    /// Create a sink and the receiver that observes it
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AudioEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { sender: Some(tx) }, rx)
    }

    /// A sink nobody listens to
    pub fn discard() -> Self {
        Self { sender: None }
    }

    /// Publish an event; a closed receiver is not an error
    pub fn emit(&self, event: AudioEvent) {
        if let Some(ref sender) = self.sender {
            let _ = sender.send(event);
        }
    }
}
