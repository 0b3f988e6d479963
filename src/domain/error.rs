//! Domain error types

use thiserror::Error;

/// Error when a user-chosen recording name cannot be used as a file name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid recording name: \"{input}\". Names must be non-empty, not all digits, and must not contain '/' or '\\'")]
pub struct InvalidRecordingName {
    pub input: String,
}

/// Error when an unknown theme is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid theme: \"{input}\". Valid themes are: dark, light")]
pub struct InvalidThemeError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
