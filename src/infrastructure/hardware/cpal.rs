//! Audio hardware session adapter using cpal
//!
//! Desktop hosts have no global audio session to switch between record
//! and playback. Configuring the session here means confirming that the
//! default device for the mode exists and can report a stream config,
//! which is where a missing or inaccessible device shows up.

use std::sync::Mutex as StdMutex;

use cpal::traits::{DeviceTrait, HostTrait};
use tracing::debug;

use crate::application::ports::{AudioHardware, SessionError};
use crate::domain::session::AudioMode;

/// Hardware session backed by the default cpal host
pub struct CpalHardware {
    device_name: StdMutex<Option<String>>,
}

impl CpalHardware {
    /// Create a new cpal hardware adapter
    pub fn new() -> Self {
        Self {
            device_name: StdMutex::new(None),
        }
    }

    /// Name of the device the session is configured for, if active
    pub fn device_name(&self) -> Option<String> {
        self.device_name
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Get the default device for a mode and check it can be configured
    fn probe(mode: AudioMode) -> Result<String, SessionError> {
        let host = cpal::default_host();

        let (device, config) = match mode {
            AudioMode::Record => {
                let device = host
                    .default_input_device()
                    .ok_or(SessionError::NoDevice(mode))?;
                let config = device
                    .default_input_config()
                    .map_err(|e| SessionError::Configuration(e.to_string()))?;
                (device, config)
            }
            AudioMode::Playback => {
                let device = host
                    .default_output_device()
                    .ok_or(SessionError::NoDevice(mode))?;
                let config = device
                    .default_output_config()
                    .map_err(|e| SessionError::Configuration(e.to_string()))?;
                (device, config)
            }
        };

        let name = device.name().unwrap_or_else(|_| "unknown device".to_string());
        debug!(
            %mode,
            host = ?host.id(),
            device = %name,
            sample_rate = config.sample_rate().0,
            channels = config.channels(),
            "audio device available"
        );

        Ok(name)
    }
}

impl Default for CpalHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioHardware for CpalHardware {
    fn configure(&self, mode: AudioMode) -> Result<(), SessionError> {
        let name = Self::probe(mode)?;
        *self.device_name.lock().unwrap_or_else(|e| e.into_inner()) = Some(name);
        Ok(())
    }

    fn release(&self, mode: AudioMode) -> Result<(), SessionError> {
        let previous = self
            .device_name
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        match previous {
            Some(device) => {
                debug!(%mode, %device, "audio device released");
                Ok(())
            }
            None => Err(SessionError::NotActive),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_adapter_has_no_device() {
        let hardware = CpalHardware::new();
        assert!(hardware.device_name().is_none());
    }

    #[test]
    fn release_without_configure_fails() {
        let hardware = CpalHardware::new();
        assert!(matches!(
            hardware.release(AudioMode::Record),
            Err(SessionError::NotActive)
        ));
    }

    #[test]
    #[ignore = "Requires audio hardware"]
    fn configure_playback_on_default_output() {
        let hardware = CpalHardware::new();
        hardware.configure(AudioMode::Playback).unwrap();
        assert!(hardware.device_name().is_some());
        hardware.release(AudioMode::Playback).unwrap();
    }
}
