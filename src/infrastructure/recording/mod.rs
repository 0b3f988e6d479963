//! Recording infrastructure module
//!
//! Captures the default microphone to AAC/M4A files through FFmpeg.

mod ffmpeg;

pub use ffmpeg::FfmpegCapture;

use crate::domain::config::AppConfig;

/// Create the capture adapter described by the configuration
pub fn create_capture(config: &AppConfig) -> FfmpegCapture {
    FfmpegCapture::new(
        config.ffmpeg_or_default(),
        config.input_format_or_default(),
        config.input_device_or_default(),
    )
}
