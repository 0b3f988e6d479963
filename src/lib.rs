//! voice-notes - record, play back and manage short audio notes
//!
//! This crate provides an interactive terminal console and one-shot
//! commands over a microphone recorder, an audio player and a local
//! directory of recordings.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Recordings, session state, theme, configuration and errors
//! - **Application**: Session manager, recorder and player use cases, port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, FFmpeg, rodio, filesystem, clipboard)
//! - **CLI**: Argument parsing, interactive console, output formatting and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
