//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{AppConfig, CaptureConfig};
use crate::domain::error::ConfigError;
use crate::domain::theme::Theme;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;
    validate_config_value(key, value)?;

    let mut config = store.load().await?;
    set_value(&mut config, key, value.to_string());

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_valid_key(key)?;

    let config = store.load().await?;
    match get_value(&config, key) {
        Some(v) => presenter.output(v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, get_value(&config, key).unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_valid_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    })
}

/// Read a config value by its dotted key
fn get_value<'a>(config: &'a AppConfig, key: &str) -> Option<&'a str> {
    let capture = config.capture.as_ref();
    match key {
        "recordings_dir" => config.recordings_dir.as_deref(),
        "theme" => config.theme.as_deref(),
        "capture.ffmpeg" => capture.and_then(|c| c.ffmpeg.as_deref()),
        "capture.input_format" => capture.and_then(|c| c.input_format.as_deref()),
        "capture.input_device" => capture.and_then(|c| c.input_device.as_deref()),
        _ => None,
    }
}

/// Write a config value by its dotted key (key must be valid)
fn set_value(config: &mut AppConfig, key: &str, value: String) {
    match key {
        "recordings_dir" => config.recordings_dir = Some(value),
        "theme" => config.theme = Some(value.trim().to_lowercase()),
        _ => {
            let capture = config.capture.get_or_insert_with(CaptureConfig::default);
            match key {
                "capture.ffmpeg" => capture.ffmpeg = Some(value),
                "capture.input_format" => capture.input_format = Some(value),
                "capture.input_device" => capture.input_device = Some(value),
                _ => {}
            }
        }
    }
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "theme" => {
            value
                .parse::<Theme>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        _ => {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    key: key.to_string(),
                    message: "Value must not be empty".to_string(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_theme_valid() {
        assert!(validate_config_value("theme", "dark").is_ok());
        assert!(validate_config_value("theme", "Light").is_ok());
    }

    #[test]
    fn validate_theme_invalid() {
        assert!(validate_config_value("theme", "sepia").is_err());
    }

    #[test]
    fn validate_rejects_blank_paths() {
        assert!(validate_config_value("recordings_dir", "  ").is_err());
        assert!(validate_config_value("capture.ffmpeg", "/usr/bin/ffmpeg").is_ok());
    }

    #[test]
    fn set_then_get_nested_key() {
        let mut config = AppConfig::empty();
        set_value(&mut config, "capture.input_device", "hw:1".to_string());

        assert_eq!(get_value(&config, "capture.input_device"), Some("hw:1"));
        assert_eq!(get_value(&config, "capture.ffmpeg"), None);
    }

    #[test]
    fn set_theme_is_normalised() {
        let mut config = AppConfig::empty();
        set_value(&mut config, "theme", "LIGHT".to_string());
        assert_eq!(config.theme_or_default(), Theme::Light);
    }

    #[test]
    fn every_valid_key_is_readable_from_defaults() {
        let config = AppConfig::defaults();
        for key in VALID_CONFIG_KEYS {
            assert!(get_value(&config, key).is_some(), "missing {}", key);
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = ensure_valid_key("api_key").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError { .. }));
    }
}
