//! Application configuration value object

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::theme::Theme;

/// FFmpeg program used for capture
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// FFmpeg input format for the default microphone on this platform
#[cfg(target_os = "linux")]
pub const DEFAULT_INPUT_FORMAT: &str = "pulse";
#[cfg(target_os = "macos")]
pub const DEFAULT_INPUT_FORMAT: &str = "avfoundation";
#[cfg(target_os = "windows")]
pub const DEFAULT_INPUT_FORMAT: &str = "dshow";
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const DEFAULT_INPUT_FORMAT: &str = "oss";

/// FFmpeg input device for the default microphone on this platform
#[cfg(target_os = "linux")]
pub const DEFAULT_INPUT_DEVICE: &str = "default";
#[cfg(target_os = "macos")]
pub const DEFAULT_INPUT_DEVICE: &str = ":0";
#[cfg(target_os = "windows")]
pub const DEFAULT_INPUT_DEVICE: &str = "audio=Microphone";
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const DEFAULT_INPUT_DEVICE: &str = "/dev/dsp";

/// Capture-specific configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub ffmpeg: Option<String>,
    pub input_format: Option<String>,
    pub input_device: Option<String>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub recordings_dir: Option<String>,
    pub theme: Option<String>,
    pub capture: Option<CaptureConfig>,
}

/// Default store directory: `<data_dir>/voice-notes/recordings`
pub fn default_recordings_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("voice-notes")
        .join("recordings")
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            recordings_dir: Some(default_recordings_dir().to_string_lossy().to_string()),
            theme: Some(Theme::default().to_string()),
            capture: Some(CaptureConfig {
                ffmpeg: Some(DEFAULT_FFMPEG.to_string()),
                input_format: Some(DEFAULT_INPUT_FORMAT.to_string()),
                input_device: Some(DEFAULT_INPUT_DEVICE.to_string()),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            recordings_dir: other.recordings_dir.or(self.recordings_dir),
            theme: other.theme.or(self.theme),
            capture: Self::merge_capture_config(self.capture, other.capture),
        }
    }

    /// Merge capture config sections
    fn merge_capture_config(
        base: Option<CaptureConfig>,
        other: Option<CaptureConfig>,
    ) -> Option<CaptureConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(CaptureConfig {
                ffmpeg: o.ffmpeg.or(b.ffmpeg),
                input_format: o.input_format.or(b.input_format),
                input_device: o.input_device.or(b.input_device),
            }),
        }
    }

    /// Get the recordings directory, or the platform default if not set
    pub fn recordings_dir_or_default(&self) -> PathBuf {
        self.recordings_dir
            .as_ref()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_recordings_dir)
    }

    /// Get theme as parsed Theme, or default if not set/invalid
    pub fn theme_or_default(&self) -> Theme {
        self.theme
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get the FFmpeg program, or "ffmpeg" if not set
    pub fn ffmpeg_or_default(&self) -> &str {
        self.capture
            .as_ref()
            .and_then(|c| c.ffmpeg.as_deref())
            .unwrap_or(DEFAULT_FFMPEG)
    }

    /// Get the FFmpeg input format, or the platform default if not set
    pub fn input_format_or_default(&self) -> &str {
        self.capture
            .as_ref()
            .and_then(|c| c.input_format.as_deref())
            .unwrap_or(DEFAULT_INPUT_FORMAT)
    }

    /// Get the FFmpeg input device, or the platform default if not set
    pub fn input_device_or_default(&self) -> &str {
        self.capture
            .as_ref()
            .and_then(|c| c.input_device.as_deref())
            .unwrap_or(DEFAULT_INPUT_DEVICE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert_eq!(config.theme, Some("dark".to_string()));
        assert!(config
            .recordings_dir
            .as_deref()
            .unwrap()
            .contains("voice-notes"));
        assert_eq!(config.ffmpeg_or_default(), "ffmpeg");
        assert_eq!(config.input_format_or_default(), DEFAULT_INPUT_FORMAT);
        assert_eq!(config.input_device_or_default(), DEFAULT_INPUT_DEVICE);
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.recordings_dir.is_none());
        assert!(config.theme.is_none());
        assert!(config.capture.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            recordings_dir: Some("/base".to_string()),
            theme: Some("dark".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            recordings_dir: None, // Should not override
            theme: Some("light".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.recordings_dir, Some("/base".to_string())); // Kept from base
        assert_eq!(merged.theme, Some("light".to_string()));
    }

    #[test]
    fn merge_capture_config() {
        let base = AppConfig {
            capture: Some(CaptureConfig {
                ffmpeg: Some("/usr/bin/ffmpeg".to_string()),
                input_format: Some("pulse".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let other = AppConfig {
            capture: Some(CaptureConfig {
                input_format: Some("alsa".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.ffmpeg_or_default(), "/usr/bin/ffmpeg");
        assert_eq!(merged.input_format_or_default(), "alsa");
    }

    #[test]
    fn theme_or_default_parses() {
        let config = AppConfig {
            theme: Some("light".to_string()),
            ..Default::default()
        };
        assert_eq!(config.theme_or_default(), Theme::Light);
    }

    #[test]
    fn theme_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            theme: Some("neon".to_string()),
            ..Default::default()
        };
        assert_eq!(config.theme_or_default(), Theme::Dark);
    }

    #[test]
    fn recordings_dir_ignores_blank() {
        let config = AppConfig {
            recordings_dir: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.recordings_dir_or_default(), default_recordings_dir());
    }

    #[test]
    fn recordings_dir_uses_configured() {
        let config = AppConfig {
            recordings_dir: Some("/tmp/notes".to_string()),
            ..Default::default()
        };
        assert_eq!(config.recordings_dir_or_default(), PathBuf::from("/tmp/notes"));
    }
}
