//! CLI layer - Command-line interface
//!
//! Contains argument parsing, the interactive console, output
//! formatting, signal handling and the one-shot command handlers.

pub mod animation;
pub mod app;
pub mod args;
pub mod commands;
pub mod config_cmd;
pub mod console;
pub mod error;
pub mod notes_cmd;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_console, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction};
pub use error::CommandError;
pub use presenter::Presenter;
