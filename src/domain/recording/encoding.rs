//! Encoding settings value object
//!
//! Voice notes are always captured as:
//! - 44.1kHz sample rate
//! - Mono channel
//! - AAC, high quality variable bitrate
//! - M4A (MPEG-4 audio) container

use std::fmt;

/// Codec used for every recording
pub const AUDIO_CODEC: &str = "aac";

/// Container used for every recording
pub const CONTAINER_FORMAT: &str = "m4a";

/// Variable bitrate quality levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EncoderQuality {
    Low,
    Medium,
    #[default]
    High,
}

impl EncoderQuality {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// VBR level understood by FFmpeg's native AAC encoder (`-q:a`, 0.1..=2)
    pub const fn vbr_level(&self) -> &'static str {
        match self {
            Self::Low => "0.5",
            Self::Medium => "1",
            Self::High => "2",
        }
    }
}

impl fmt::Display for EncoderQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed capture parameters handed to the capture backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingSettings {
    pub sample_rate: u32,
    pub channels: u16,
    pub quality: EncoderQuality,
}

impl EncodingSettings {
    /// Settings used for every voice note
    pub const fn voice_note() -> Self {
        Self {
            sample_rate: 44_100,
            channels: 1,
            quality: EncoderQuality::High,
        }
    }
}

impl Default for EncodingSettings {
    fn default() -> Self {
        Self::voice_note()
    }
}

impl fmt::Display for EncodingSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = if self.channels == 1 { "mono" } else { "stereo" };
        write!(
            f,
            "{} {} {}Hz {} quality",
            AUDIO_CODEC.to_uppercase(),
            layout,
            self.sample_rate,
            self.quality
        )
    }
}
