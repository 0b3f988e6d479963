//! Session state machine shared by the recorder and the player

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

/// Exclusive configuration of the hardware audio session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioMode {
    Record,
    Playback,
}

impl AudioMode {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Record => "record",
            Self::Playback => "playback",
        }
    }

    /// The state a session is in while a stream of this mode runs
    pub const fn active_state(&self) -> SessionState {
        match self {
            Self::Record => SessionState::Recording,
            Self::Playback => SessionState::Playing,
        }
    }
}

impl fmt::Display for AudioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    Playing,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Playing => "playing",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: String,
}

/// Session entity.
/// Holds the single transport state shared by recorder and player.
///
/// State machine:
///   IDLE -> RECORDING (begin Record)
///   IDLE -> PLAYING   (begin Playback)
///   RECORDING -> IDLE (finish Record)
///   PLAYING -> IDLE   (finish Playback)
#[derive(Debug, Default)]
pub struct Session {
    state: SessionState,
}

impl Session {
    /// Create a new session in idle state
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Create an idle session behind a shared async lock
    pub fn shared() -> Arc<Mutex<Session>> {
        Arc::new(Mutex::new(Self::new()))
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if currently idle
    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Check if currently recording
    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Check if currently playing
    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }

    /// Fail unless a stream of `mode` could begin now
    pub fn ensure_can_begin(&self, mode: AudioMode) -> Result<(), InvalidStateTransition> {
        if self.state != SessionState::Idle {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: begin_action(mode).to_string(),
            });
        }
        Ok(())
    }

    /// Transition from IDLE to the active state of `mode`
    pub fn begin(&mut self, mode: AudioMode) -> Result<(), InvalidStateTransition> {
        self.ensure_can_begin(mode)?;
        self.state = mode.active_state();
        Ok(())
    }

    /// Transition from the active state of `mode` back to IDLE
    pub fn finish(&mut self, mode: AudioMode) -> Result<(), InvalidStateTransition> {
        if self.state != mode.active_state() {
            return Err(InvalidStateTransition {
                current_state: self.state,
                action: finish_action(mode).to_string(),
            });
        }
        self.state = SessionState::Idle;
        Ok(())
    }
}

fn begin_action(mode: AudioMode) -> &'static str {
    match mode {
        AudioMode::Record => "start recording",
        AudioMode::Playback => "start playback",
    }
}

fn finish_action(mode: AudioMode) -> &'static str {
    match mode {
        AudioMode::Record => "stop recording",
        AudioMode::Playback => "stop playback",
    }
}
