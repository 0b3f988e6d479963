//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like cpal, FFmpeg, rodio,
//! the filesystem and the clipboard.

pub mod config;
pub mod hardware;
pub mod playback;
pub mod recording;
pub mod share;
pub mod store;

// Re-export adapters
pub use config::XdgConfigStore;
pub use hardware::CpalHardware;
pub use playback::RodioPlayback;
pub use recording::{create_capture, FfmpegCapture};
pub use share::{create_share, ArboardShare};
pub use store::FsRecordingStore;
