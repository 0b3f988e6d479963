//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::theme::Theme;

/// voice-notes - record, play back and manage short audio notes
#[derive(Parser, Debug)]
#[command(name = "voice-notes")]
#[command(version)]
#[command(about = "Record, play back and manage short audio notes")]
#[command(long_about = None)]
pub struct Cli {
    /// Directory holding the recordings
    #[arg(long, value_name = "DIR", global = true)]
    pub dir: Option<PathBuf>,

    /// Initial color theme of the console
    #[arg(long, value_name = "THEME", global = true)]
    pub theme: Option<ThemeArg>,

    /// Run a single command instead of the interactive console
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List recordings, newest first
    List {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a new note until Ctrl-C
    Record,
    /// Play a recording until it ends or Ctrl-C
    Play {
        /// List index (1-based) or name of the recording
        recording: String,
    },
    /// Rename a recording
    Rename {
        /// List index (1-based) or name of the recording
        recording: String,
        /// New name, without extension
        new_name: String,
    },
    /// Delete a recording
    Delete {
        /// List index (1-based) or name of the recording
        recording: String,
    },
    /// Copy a recording's path to the clipboard
    Share {
        /// List index (1-based) or name of the recording
        recording: String,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Theme argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Dark,
    Light,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Dark => Theme::Dark,
            ThemeArg::Light => Theme::Light,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "recordings_dir",
    "theme",
    "capture.ffmpeg",
    "capture.input_format",
    "capture.input_device",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
