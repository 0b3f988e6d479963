//! Player use case

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::error::AudioError;
use super::events::{AudioEvent, EventSink};
use super::monitor::{supervise, RunningStream};
use super::ports::{PlaybackBackend, StreamEnd};
use super::session_manager::{SessionManager, SharedSession};
use crate::domain::session::{AudioMode, InvalidStateTransition};

/// Owns at most one playback stream.
///
/// Calling `play` while already playing stops the current stream first
/// (the last call wins).
pub struct Player<B: PlaybackBackend> {
    backend: B,
    sessions: SessionManager,
    session: SharedSession,
    events: EventSink,
    current: Mutex<Option<RunningStream>>,
}

impl<B: PlaybackBackend> Player<B> {
    /// Create a new player
    pub fn new(
        backend: B,
        sessions: SessionManager,
        session: SharedSession,
        events: EventSink,
    ) -> Self {
        Self {
            backend,
            sessions,
            session,
            events,
            current: Mutex::new(None),
        }
    }

    /// Published playing state
    pub async fn is_playing(&self) -> bool {
        self.session.lock().await.is_playing()
    }

    /// File currently playing, if any
    pub async fn now_playing(&self) -> Option<PathBuf> {
        if !self.is_playing().await {
            return None;
        }
        self.current
            .lock()
            .await
            .as_ref()
            .map(|running| running.path().to_path_buf())
    }

    /// Start playing `source`
    pub async fn play(&self, source: &Path) -> Result<(), AudioError> {
        if self.is_playing().await {
            let previous = self.stop().await?;
            debug!(%previous, "replaced current playback");
        }

        let mut current = self.current.lock().await;
        let mut session = self.session.lock().await;
        session.ensure_can_begin(AudioMode::Playback)?;

        let guard = self.sessions.activate(AudioMode::Playback).await?;
        let stream = match self.backend.play(source).await {
            Ok(stream) => stream,
            Err(e) => {
                if let Err(release) = guard.deactivate() {
                    warn!(error = %release, "failed to release audio session");
                }
                return Err(e.into());
            }
        };

        session.begin(AudioMode::Playback)?;
        info!(path = %source.display(), "playback started");
        self.events.emit(AudioEvent::Started {
            mode: AudioMode::Playback,
            path: source.to_path_buf(),
        });

        *current = Some(supervise(
            AudioMode::Playback,
            source.to_path_buf(),
            stream,
            guard,
            self.session.clone(),
            self.events.clone(),
        ));

        Ok(())
    }

    /// Stop playback and wait until the session is idle again
    pub async fn stop(&self) -> Result<StreamEnd, AudioError> {
        let running = self.current.lock().await.take();
        match running {
            Some(running) => Ok(running.stop().await),
            None => Err(InvalidStateTransition {
                current_state: self.session.lock().await.state(),
                action: "stop playback".to_string(),
            }
            .into()),
        }
    }
}
