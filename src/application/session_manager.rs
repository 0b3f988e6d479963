//! Session manager: single owner of the hardware audio session
//!
//! The manager is a cheap cloneable handle around one shared instance.
//! `activate` hands out a [`SessionGuard`]; only one guard can exist at a
//! time, and the session is released when the guard is deactivated or
//! dropped.

use std::fmt;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::ports::{AudioHardware, SessionError};
use crate::domain::session::{AudioMode, Session};

/// Transport state shared by the recorder and the player
pub type SharedSession = Arc<Mutex<Session>>;

struct Inner {
    hardware: Box<dyn AudioHardware>,
    active: StdMutex<Option<AudioMode>>,
}

impl Inner {
    fn active(&self) -> MutexGuard<'_, Option<AudioMode>> {
        self.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn release(&self, mode: AudioMode) -> Result<(), SessionError> {
        {
            let mut active = self.active();
            if *active != Some(mode) {
                return Err(SessionError::NotActive);
            }
            *active = None;
        }

        self.hardware.release(mode)?;
        debug!(%mode, "audio session deactivated");
        Ok(())
    }
}

/// Handle to the hardware audio session
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    /// Create a manager owning `hardware`
    pub fn new(hardware: impl AudioHardware + 'static) -> Self {
        Self {
            inner: Arc::new(Inner {
                hardware: Box::new(hardware),
                active: StdMutex::new(None),
            }),
        }
    }

    /// Configure the session for exclusive use in `mode`.
    ///
    /// The slot is reserved before the hardware is probed, so a concurrent
    /// activation sees `Busy` rather than racing the probe. Probing runs on
    /// the blocking pool.
    pub async fn activate(&self, mode: AudioMode) -> Result<SessionGuard, SessionError> {
        {
            let mut active = self.inner.active();
            if let Some(current) = *active {
                return Err(SessionError::Busy { active: current });
            }
            *active = Some(mode);
        }
        let mut reservation = Reservation {
            inner: &self.inner,
            kept: false,
        };

        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.hardware.configure(mode))
            .await
            .map_err(|e| SessionError::Configuration(e.to_string()))??;

        reservation.kept = true;
        debug!(%mode, "audio session activated");

        Ok(SessionGuard {
            inner: Arc::clone(&self.inner),
            mode,
            released: false,
        })
    }

    /// Mode the session is currently configured for, if any
    pub fn active_mode(&self) -> Option<AudioMode> {
        *self.inner.active()
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("active", &self.active_mode())
            .finish()
    }
}

/// Slot held while the hardware is being configured; cleared unless kept
struct Reservation<'a> {
    inner: &'a Inner,
    kept: bool,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.kept {
            *self.inner.active() = None;
        }
    }
}

/// Proof of exclusive use of the audio session
#[must_use = "dropping the guard releases the audio session"]
pub struct SessionGuard {
    inner: Arc<Inner>,
    mode: AudioMode,
    released: bool,
}

impl SessionGuard {
    /// Mode the session was activated for
    pub fn mode(&self) -> AudioMode {
        self.mode
    }

    /// Release exclusive use of the session
    pub fn deactivate(mut self) -> Result<(), SessionError> {
        self.released = true;
        self.inner.release(self.mode)
    }
}

impl fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionGuard")
            .field("mode", &self.mode)
            .finish()
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if !self.released {
            if let Err(e) = self.inner.release(self.mode) {
                warn!(mode = %self.mode, error = %e, "failed to release audio session");
            }
        }
    }
}
