//! Hand-written port mocks shared by the application tests

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::ports::{
    stream_channel, ActiveStream, AudioHardware, CaptureBackend, PlaybackBackend, SessionError,
    StreamEnd, StreamError, StreamLink,
};
use crate::domain::recording::EncodingSettings;
use crate::domain::session::AudioMode;

#[derive(Default)]
struct HardwareLog {
    configured: Vec<AudioMode>,
    released: Vec<AudioMode>,
}

/// Audio hardware that records every call
#[derive(Clone, Default)]
pub struct MockHardware {
    log: Arc<Mutex<HardwareLog>>,
    refuse: Option<AudioMode>,
    fail_release: bool,
}

impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hardware that has no device for `mode`
    pub fn refusing(mode: AudioMode) -> Self {
        Self {
            refuse: Some(mode),
            ..Self::default()
        }
    }

    /// Hardware whose release always fails
    pub fn failing_release() -> Self {
        Self {
            fail_release: true,
            ..Self::default()
        }
    }

    pub fn configured(&self) -> Vec<AudioMode> {
        self.log.lock().unwrap().configured.clone()
    }

    pub fn released(&self) -> Vec<AudioMode> {
        self.log.lock().unwrap().released.clone()
    }
}

impl AudioHardware for MockHardware {
    fn configure(&self, mode: AudioMode) -> Result<(), SessionError> {
        if self.refuse == Some(mode) {
            return Err(SessionError::NoDevice(mode));
        }
        self.log.lock().unwrap().configured.push(mode);
        Ok(())
    }

    fn release(&self, mode: AudioMode) -> Result<(), SessionError> {
        self.log.lock().unwrap().released.push(mode);
        if self.fail_release {
            return Err(SessionError::Configuration("device vanished".into()));
        }
        Ok(())
    }
}

#[derive(Default)]
struct BackendState {
    enders: Vec<oneshot::Sender<StreamEnd>>,
    last_settings: Option<EncodingSettings>,
}

/// Capture and playback backend driven by the test
#[derive(Clone, Default)]
pub struct ScriptedBackend {
    state: Arc<Mutex<BackendState>>,
    starts: Arc<AtomicUsize>,
    start_error: Option<StreamError>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose streams never start
    pub fn failing_start(error: StreamError) -> Self {
        Self {
            start_error: Some(error),
            ..Self::default()
        }
    }

    /// Number of streams started
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    /// Settings passed to the last capture
    pub fn last_settings(&self) -> Option<EncodingSettings> {
        self.state.lock().unwrap().last_settings
    }

    /// End the most recent stream as if the backend reported `end`
    pub fn end_latest(&self, end: StreamEnd) {
        if let Some(tx) = self.state.lock().unwrap().enders.pop() {
            let _ = tx.send(end);
        }
    }

    fn launch(&self) -> Result<ActiveStream, StreamError> {
        if let Some(ref e) = self.start_error {
            return Err(e.clone());
        }
        self.starts.fetch_add(1, Ordering::SeqCst);

        let (stream, link) = stream_channel();
        let (end_tx, end_rx) = oneshot::channel();
        self.state.lock().unwrap().enders.push(end_tx);

        tokio::spawn(async move {
            let StreamLink { stop, finished } = link;
            let end = tokio::select! {
                _ = stop => StreamEnd::Stopped,
                end = end_rx => end.unwrap_or(StreamEnd::Stopped),
            };
            let _ = finished.send(end);
        });

        Ok(stream)
    }
}

#[async_trait]
impl CaptureBackend for ScriptedBackend {
    async fn start(
        &self,
        _destination: &Path,
        settings: &EncodingSettings,
    ) -> Result<ActiveStream, StreamError> {
        self.state.lock().unwrap().last_settings = Some(*settings);
        self.launch()
    }
}

#[async_trait]
impl PlaybackBackend for ScriptedBackend {
    async fn play(&self, _source: &Path) -> Result<ActiveStream, StreamError> {
        self.launch()
    }
}
