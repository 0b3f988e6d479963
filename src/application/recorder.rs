//! Recorder use case

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{info, warn};

use super::error::AudioError;
use super::events::{AudioEvent, EventSink};
use super::monitor::{supervise, RunningStream};
use super::ports::{CaptureBackend, StreamEnd};
use super::session_manager::{SessionManager, SharedSession};
use crate::domain::recording::EncodingSettings;
use crate::domain::session::{AudioMode, InvalidStateTransition};

/// Owns at most one capture stream.
///
/// State machine:
///   IDLE -> RECORDING (start, after the session is activated for Record)
///   RECORDING -> IDLE (stop, or the stream ending on its own)
pub struct Recorder<B: CaptureBackend> {
    backend: B,
    sessions: SessionManager,
    session: SharedSession,
    events: EventSink,
    settings: EncodingSettings,
    current: Mutex<Option<RunningStream>>,
}

impl<B: CaptureBackend> Recorder<B> {
    /// Create a recorder using the fixed voice-note encoding
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
            settings: EncodingSettings::voice_note(),
            current: Mutex::new(None),
        }
    }

    /// Encoding used for every capture
    pub fn settings(&self) -> &EncodingSettings {
        &self.settings
    }

    /// Published recording state
    pub async fn is_recording(&self) -> bool {
        self.session.lock().await.is_recording()
    }

    /// File currently being written, if recording
    pub async fn current_path(&self) -> Option<PathBuf> {
        if !self.is_recording().await {
            return None;
        }
        self.current
            .lock()
            .await
            .as_ref()
            .map(|running| running.path().to_path_buf())
    }

    /// Start capturing into `destination`, which must not exist yet
    pub async fn start(&self, destination: &Path) -> Result<(), AudioError> {
        let mut current = self.current.lock().await;
        let mut session = self.session.lock().await;
        session.ensure_can_begin(AudioMode::Record)?;

        let guard = self.sessions.activate(AudioMode::Record).await?;
        let stream = match self.backend.start(destination, &self.settings).await {
            Ok(stream) => stream,
            Err(e) => {
                if let Err(release) = guard.deactivate() {
                    warn!(error = %release, "failed to release audio session");
                }
                return Err(e.into());
            }
        };

        session.begin(AudioMode::Record)?;
        info!(path = %destination.display(), settings = %self.settings, "recording started");
        self.events.emit(AudioEvent::Started {
            mode: AudioMode::Record,
            path: destination.to_path_buf(),
        });

        *current = Some(supervise(
            AudioMode::Record,
            destination.to_path_buf(),
            stream,
            guard,
            self.session.clone(),
            self.events.clone(),
        ));

        Ok(())
    }

    /// Stop the capture and wait until the session is idle again
    pub async fn stop(&self) -> Result<StreamEnd, AudioError> {
        let running = self.current.lock().await.take();
        match running {
            Some(running) => Ok(running.stop().await),
            None => Err(InvalidStateTransition {
                current_state: self.session.lock().await.state(),
                action: "stop recording".to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{SessionError, StreamError};
    use crate::application::test_support::{MockHardware, ScriptedBackend};
    use crate::domain::session::{Session, SessionState};
    use tokio::sync::mpsc::UnboundedReceiver;

    fn recorder(
        backend: ScriptedBackend,
        hardware: MockHardware,
    ) -> (
        Recorder<ScriptedBackend>,
        SharedSession,
        UnboundedReceiver<AudioEvent>,
    ) {
        let (events, rx) = EventSink::channel();
        let session = Session::shared();
        let recorder = Recorder::new(
            backend,
            SessionManager::new(hardware),
            session.clone(),
            events,
        );
        (recorder, session, rx)
    }

    #[tokio::test]
    async fn start_and_stop() {
        let hardware = MockHardware::new();
        let (recorder, _, mut rx) = recorder(ScriptedBackend::new(), hardware.clone());
        let path = PathBuf::from("recording_1.000000.m4a");

        assert!(!recorder.is_recording().await);
        recorder.start(&path).await.unwrap();
        assert!(recorder.is_recording().await);
        assert_eq!(recorder.current_path().await, Some(path.clone()));

        let end = recorder.stop().await.unwrap();
        assert_eq!(end, StreamEnd::Stopped);
        assert!(!recorder.is_recording().await);
        assert_eq!(hardware.released(), vec![AudioMode::Record]);

        assert_eq!(
            rx.recv().await,
            Some(AudioEvent::Started {
                mode: AudioMode::Record,
                path: path.clone()
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(AudioEvent::Finished {
                mode: AudioMode::Record,
                path,
                end: StreamEnd::Stopped
            })
        );
    }

    #[tokio::test]
    async fn encoding_settings_reach_backend() {
        let backend = ScriptedBackend::new();
        let (recorder, _, _rx) = recorder(backend.clone(), MockHardware::new());

        recorder.start(Path::new("a.m4a")).await.unwrap();
        assert_eq!(
            backend.last_settings(),
            Some(EncodingSettings::voice_note())
        );
    }

    #[tokio::test]
    async fn session_failure_keeps_idle() {
        let backend = ScriptedBackend::new();
        let (recorder, _, _rx) = recorder(backend.clone(), MockHardware::refusing(AudioMode::Record));

        let err = recorder.start(Path::new("a.m4a")).await.unwrap_err();
        assert!(matches!(err, AudioError::Session(SessionError::NoDevice(_))));
        assert!(!recorder.is_recording().await);
        assert_eq!(backend.starts(), 0);
    }

    #[tokio::test]
    async fn start_failure_releases_session() {
        let hardware = MockHardware::new();
        let backend = ScriptedBackend::failing_start(StreamError::FfmpegNotFound);
        let (recorder, _, _rx) = recorder(backend, hardware.clone());

        let err = recorder.start(Path::new("a.m4a")).await.unwrap_err();
        assert!(matches!(err, AudioError::Stream(StreamError::FfmpegNotFound)));
        assert!(!recorder.is_recording().await);
        assert_eq!(hardware.released(), vec![AudioMode::Record]);
    }

    #[tokio::test]
    async fn start_failure_reports_stream_error_when_release_fails() {
        let backend = ScriptedBackend::failing_start(StreamError::StartFailed("bad device".into()));
        let (recorder, _, _rx) = recorder(backend, MockHardware::failing_release());

        let err = recorder.start(Path::new("a.m4a")).await.unwrap_err();
        assert!(matches!(err, AudioError::Stream(StreamError::StartFailed(_))));
        assert!(!recorder.is_recording().await);
        assert_eq!(recorder.sessions.active_mode(), None);
    }

    #[tokio::test]
    async fn runtime_failure_returns_to_idle() {
        let hardware = MockHardware::new();
        let backend = ScriptedBackend::new();
        let (recorder, _, mut rx) = recorder(backend.clone(), hardware.clone());

        recorder.start(Path::new("a.m4a")).await.unwrap();
        rx.recv().await; // Started

        backend.end_latest(StreamEnd::Failed("encoder crashed".into()));
        let finished = rx.recv().await.unwrap();
        assert!(matches!(
            finished,
            AudioEvent::Finished { end: StreamEnd::Failed(_), .. }
        ));

        assert!(!recorder.is_recording().await);
        assert_eq!(hardware.released(), vec![AudioMode::Record]);

        // Stop after the failure reports the failure, and a new start works
        let end = recorder.stop().await.unwrap();
        assert!(end.is_failure());
        recorder.start(Path::new("b.m4a")).await.unwrap();
        assert!(recorder.is_recording().await);
    }

    #[tokio::test]
    async fn stop_when_idle_fails() {
        let (recorder, _, _rx) = recorder(ScriptedBackend::new(), MockHardware::new());
        let err = recorder.stop().await.unwrap_err();
        assert!(matches!(err, AudioError::InvalidState(_)));
    }

    #[tokio::test]
    async fn start_while_recording_fails() {
        let backend = ScriptedBackend::new();
        let (recorder, _, _rx) = recorder(backend.clone(), MockHardware::new());

        recorder.start(Path::new("a.m4a")).await.unwrap();
        let err = recorder.start(Path::new("b.m4a")).await.unwrap_err();
        assert!(matches!(err, AudioError::InvalidState(_)));
        assert_eq!(backend.starts(), 1);
    }

    #[tokio::test]
    async fn start_while_playing_fails() {
        let (recorder, session, _rx) = recorder(ScriptedBackend::new(), MockHardware::new());
        session.lock().await.begin(AudioMode::Playback).unwrap();

        let err = recorder.start(Path::new("a.m4a")).await.unwrap_err();
        match err {
            AudioError::InvalidState(e) => assert_eq!(e.current_state, SessionState::Playing),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn state_tracks_latest_transition() {
        let (recorder, _, _rx) = recorder(ScriptedBackend::new(), MockHardware::new());

        for i in 0..3 {
            recorder
                .start(Path::new(&format!("{i}.m4a")))
                .await
                .unwrap();
            assert!(recorder.is_recording().await);
            recorder.stop().await.unwrap();
            assert!(!recorder.is_recording().await);
        }
    }
}
