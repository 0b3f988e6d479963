//! Application layer - Use cases and port interfaces
//!
//! Contains the recorder and player use cases, the session manager that
//! serialises access to the audio hardware, and the trait definitions
//! for external system interactions.

pub mod error;
pub mod events;
mod monitor;
pub mod player;
pub mod ports;
pub mod recorder;
pub mod session_manager;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export use cases
pub use error::AudioError;
pub use events::{AudioEvent, EventSink};
pub use player::Player;
pub use recorder::Recorder;
pub use session_manager::{SessionGuard, SessionManager, SharedSession};
