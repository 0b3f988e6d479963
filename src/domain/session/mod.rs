//! Audio session domain: hardware modes and the shared transport state

mod session;

pub use session::{AudioMode, InvalidStateTransition, Session, SessionState};
