//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod recording;
pub mod session;
pub mod theme;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use recording::{EncodingSettings, Recording};
pub use session::{AudioMode, InvalidStateTransition, Session, SessionState};
pub use theme::Theme;
