//! Supervision of a running stream
//!
//! Every stream gets one monitor task. It waits for the stream's single
//! outcome, returns the session to idle, releases the hardware session
//! and publishes the `Finished` event. Explicit stops and spontaneous
//! endings take the same path, so each transition happens exactly once.

use std::path::{Path, PathBuf};

use tokio::sync::oneshot;
use tracing::{info, warn};

use super::events::{AudioEvent, EventSink};
use super::ports::{ActiveStream, StopHandle, StreamEnd};
use super::session_manager::{SessionGuard, SharedSession};
use crate::domain::session::AudioMode;

/// A stream owned by the recorder or the player
#[derive(Debug)]
pub(crate) struct RunningStream {
    path: PathBuf,
    stop: StopHandle,
    done: oneshot::Receiver<StreamEnd>,
}

impl RunningStream {
    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Request a stop and wait until the monitor has applied the outcome
    pub(crate) async fn stop(mut self) -> StreamEnd {
        self.stop.request_stop();
        self.done.await.unwrap_or(StreamEnd::Stopped)
    }
}

/// Spawn the monitor task for a freshly started stream
pub(crate) fn supervise(
    mode: AudioMode,
    path: PathBuf,
    stream: ActiveStream,
    guard: SessionGuard,
    session: SharedSession,
    events: EventSink,
) -> RunningStream {
    let ActiveStream { stop, finished } = stream;
    let (done_tx, done_rx) = oneshot::channel();
    let task_path = path.clone();

    tokio::spawn(async move {
        let end = finished.await.unwrap_or_else(|_| {
            StreamEnd::Failed("stream ended without reporting an outcome".to_string())
        });

        let mut session = session.lock().await;
        if let Err(e) = session.finish(mode) {
            warn!(%mode, error = %e, "stream finished in unexpected state");
        }

        // Release is best-effort; the stream is over either way
        if let Err(e) = guard.deactivate() {
            warn!(%mode, error = %e, "failed to release audio session");
        }

        match end {
            StreamEnd::Failed(ref reason) => {
                warn!(%mode, path = %task_path.display(), %reason, "stream failed")
            }
            _ => info!(%mode, path = %task_path.display(), %end, "stream finished"),
        }

        events.emit(AudioEvent::Finished {
            mode,
            path: task_path,
            end: end.clone(),
        });
        drop(session);

        let _ = done_tx.send(end);
    });

    RunningStream {
        path,
        stop,
        done: done_rx,
    }
}
