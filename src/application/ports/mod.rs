//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod hardware;
pub mod player;
pub mod recorder;
pub mod share;
pub mod store;
pub mod stream;

// Re-export common types
pub use config::ConfigStore;
pub use hardware::{AudioHardware, SessionError};
pub use player::PlaybackBackend;
pub use recorder::CaptureBackend;
pub use share::{Share, ShareError};
pub use store::{RecordingStore, StoreError};
pub use stream::{stream_channel, ActiveStream, StopHandle, StreamEnd, StreamError, StreamLink};
