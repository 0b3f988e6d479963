//! Share infrastructure module
//!
//! Sharing hands the recording's absolute path to the system clipboard
//! so it can be pasted into another application.

mod arboard;

pub use self::arboard::ArboardShare;

use crate::application::ports::Share;

/// Create the default share target for the current platform
pub fn create_share() -> Box<dyn Share> {
    Box::new(ArboardShare::new())
}
