//! Main app runner for the interactive console

use std::io::{self, BufRead};
use std::process::ExitCode;

use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::debug;

use crate::application::ports::ConfigStore;
use crate::application::{AudioEvent, EventSink, Player, Recorder, SessionManager};
use crate::domain::config::AppConfig;
use crate::domain::session::Session;
use crate::infrastructure::{
    create_capture, create_share, CpalHardware, FfmpegCapture, FsRecordingStore, RodioPlayback,
    XdgConfigStore,
};

use super::animation::FRAME_INTERVAL;
use super::commands::Command;
use super::console::{Console, Flow};
use super::presenter::Presenter;
use super::signals::ShutdownListener;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Recorder and player sharing one hardware session and event channel
pub struct AudioStack {
    pub recorder: Recorder<FfmpegCapture>,
    pub player: Player<RodioPlayback>,
    pub events: UnboundedReceiver<AudioEvent>,
}

impl AudioStack {
    /// Wire the use cases to the platform adapters
    pub fn new(config: &AppConfig) -> Self {
        let sessions = SessionManager::new(CpalHardware::new());
        let session = Session::shared();
        let (sink, events) = EventSink::channel();

        let recorder = Recorder::new(
            create_capture(config),
            sessions.clone(),
            session.clone(),
            sink.clone(),
        );
        let player = Player::new(RodioPlayback::new(), sessions, session, sink);

        Self {
            recorder,
            player,
            events,
        }
    }
}

/// Run the interactive console until `quit`, end of input or a shutdown signal
pub async fn run_console(config: AppConfig) -> ExitCode {
    let presenter = Presenter::with_theme(config.theme_or_default());

    let mut shutdown = match ShutdownListener::new() {
        Ok(listener) => listener,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let store = FsRecordingStore::new(config.recordings_dir_or_default());
    presenter.info(&format!("Recordings in {}", store.dir().display()));

    let AudioStack {
        recorder,
        player,
        mut events,
    } = AudioStack::new(&config);
    let mut console = Console::new(recorder, player, store, create_share(), presenter);

    if let Err(e) = console.show_list().await {
        console.presenter().error(&e.to_string());
    }
    console
        .presenter()
        .info("Type 'help' for commands, 'quit' to leave");

    let mut lines = match spawn_input_reader() {
        Ok(lines) => lines,
        Err(e) => {
            console
                .presenter()
                .error(&format!("Failed to read input: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let mut frames = tokio::time::interval(FRAME_INTERVAL);

    loop {
        tokio::select! {
            line = lines.recv() => match line {
                Some(Ok(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<Command>() {
                        Ok(command) => {
                            if console.handle(command).await == Flow::Quit {
                                break;
                            }
                        }
                        Err(e) => console.presenter().error(&e.to_string()),
                    }
                }
                None => {
                    debug!("end of input");
                    break;
                }
                Some(Err(e)) => {
                    console.presenter().error(&format!("Failed to read input: {}", e));
                    break;
                }
            },
            Some(event) = events.recv() => console.handle_event(event).await,
            _ = frames.tick() => console.tick(),
            signal = shutdown.recv() => {
                debug!(?signal, "shutdown requested");
                break;
            }
        }
    }

    console.shutdown().await;
    ExitCode::from(EXIT_SUCCESS)
}

/// Read stdin lines on a dedicated thread.
///
/// The thread may stay blocked in a read when the console exits; it does
/// not keep the process alive.
fn spawn_input_reader() -> io::Result<UnboundedReceiver<io::Result<String>>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::Builder::new()
        .name("voice-notes-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Load and merge configuration from file and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load_or_empty().await;

    // Merge: defaults < file < cli
    AppConfig::defaults().merge(file_config).merge(cli_config)
}
