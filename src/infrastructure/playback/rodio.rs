//! Rodio-based playback adapter
//!
//! rodio's output stream is not `Send`, so each playback owns a
//! dedicated thread. The thread decodes the file before opening the
//! output, which lets a missing or undecodable file fail `play` itself.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, Sink};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::debug;

use crate::application::ports::{
    stream_channel, ActiveStream, PlaybackBackend, StreamEnd, StreamError, StreamLink,
};

/// How often the playback thread checks for a stop request
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Playback implementation using rodio
pub struct RodioPlayback;

impl RodioPlayback {
    /// Create a new rodio-based player
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioPlayback {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlaybackBackend for RodioPlayback {
    async fn play(&self, source: &Path) -> Result<ActiveStream, StreamError> {
        let (stream, link) = stream_channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let path = source.to_path_buf();

        std::thread::Builder::new()
            .name("voice-notes-playback".to_string())
            .spawn(move || play_blocking(path, link, ready_tx))
            .map_err(|e| StreamError::StartFailed(e.to_string()))?;

        ready_rx.await.map_err(|_| {
            StreamError::StartFailed("playback thread exited before starting".to_string())
        })??;

        Ok(stream)
    }
}

/// Open and decode an audio file
fn open_decoder(path: &Path) -> Result<Decoder<BufReader<File>>, StreamError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => StreamError::SourceNotFound(path.display().to_string()),
        _ => StreamError::StartFailed(format!("{}: {}", path.display(), e)),
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| StreamError::Undecodable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Play a file to the end or until stopped (runs on the playback thread)
fn play_blocking(
    path: PathBuf,
    link: StreamLink,
    ready: oneshot::Sender<Result<(), StreamError>>,
) {
    let StreamLink { mut stop, finished } = link;

    let decoder = match open_decoder(&path) {
        Ok(decoder) => decoder,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };

    let (_stream, stream_handle) = match OutputStream::try_default() {
        Ok(output) => output,
        Err(e) => {
            let _ = ready.send(Err(StreamError::OutputUnavailable(e.to_string())));
            return;
        }
    };

    let sink = match Sink::try_new(&stream_handle) {
        Ok(sink) => sink,
        Err(e) => {
            let _ = ready.send(Err(StreamError::OutputUnavailable(e.to_string())));
            return;
        }
    };

    sink.append(decoder);
    let _ = ready.send(Ok(()));
    debug!(path = %path.display(), "playback thread running");

    let end = loop {
        match stop.try_recv() {
            Ok(()) | Err(TryRecvError::Closed) => {
                sink.stop();
                break StreamEnd::Stopped;
            }
            Err(TryRecvError::Empty) => {}
        }

        if sink.empty() {
            break StreamEnd::Completed;
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    let _ = finished.send(end);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_fails_to_start() {
        let dir = tempfile::tempdir().unwrap();
        let player = RodioPlayback::new();

        let err = player
            .play(&dir.path().join("nothing-here.m4a"))
            .await
            .unwrap_err();
        assert!(matches!(err, StreamError::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn garbage_file_is_undecodable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.m4a");
        std::fs::write(&path, b"this is not audio at all").unwrap();

        let err = RodioPlayback::new().play(&path).await.unwrap_err();
        assert!(matches!(err, StreamError::Undecodable { .. }));
    }
}
