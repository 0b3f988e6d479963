//! Configuration domain

mod app_config;

pub use app_config::{default_recordings_dir, AppConfig, CaptureConfig};
