//! voice-notes CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use voice_notes::cli::{
    app::{load_merged_config, run_console, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    notes_cmd::handle_notes_command,
    presenter::Presenter,
};
use voice_notes::domain::config::AppConfig;
use voice_notes::domain::theme::Theme;
use voice_notes::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    // Diagnostics go to stderr; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    // Config management never needs the merged configuration
    let command = match cli.command {
        Some(Commands::Config { action }) => {
            let presenter = Presenter::new();
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        command => command,
    };

    // Build CLI config from args
    let cli_config = AppConfig {
        recordings_dir: cli.dir.map(|dir| dir.to_string_lossy().to_string()),
        theme: cli.theme.map(|t| Theme::from(t).to_string()),
        capture: None,
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    match command {
        Some(command) => {
            let mut presenter = Presenter::with_theme(config.theme_or_default());
            match handle_notes_command(command, &config, &mut presenter).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    presenter.stop_spinner();
                    presenter.error(&e.to_string());
                    ExitCode::from(EXIT_ERROR)
                }
            }
        }
        None => run_console(config).await,
    }
}
