//! One-shot recording commands: list, record, play, rename, delete, share

use std::time::SystemTime;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::application::ports::{RecordingStore, Share, StreamEnd};
use crate::application::AudioEvent;
use crate::domain::config::AppConfig;
use crate::domain::recording::Recording;
use crate::domain::session::AudioMode;
use crate::infrastructure::{create_share, FsRecordingStore};

use super::animation::{Pulse, FRAME_INTERVAL, PULSE_WIDTH};
use super::app::AudioStack;
use super::args::Commands;
use super::commands::Selector;
use super::error::CommandError;
use super::presenter::Presenter;
use super::signals::ShutdownListener;

/// One recording as printed by `list --json`
#[derive(Debug, Serialize)]
pub struct RecordingEntry {
    pub name: String,
    pub file_name: String,
    pub path: String,
    pub captured_at: Option<String>,
}

impl From<&Recording> for RecordingEntry {
    fn from(recording: &Recording) -> Self {
        Self {
            name: recording.display_name().to_string(),
            file_name: recording.file_name().to_string(),
            path: recording.path().display().to_string(),
            captured_at: recording.captured_at().map(|at| at.to_rfc3339()),
        }
    }
}

/// Handle a one-shot recording command (everything except `config`)
pub async fn handle_notes_command(
    command: Commands,
    config: &AppConfig,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    let store = FsRecordingStore::new(config.recordings_dir_or_default());

    match command {
        Commands::List { json } => handle_list(&store, presenter, json).await,
        Commands::Record => handle_record(&store, config, presenter).await,
        Commands::Play { recording } => {
            handle_play(&store, config, presenter, &recording.parse::<Selector>()?).await
        }
        Commands::Rename {
            recording,
            new_name,
        } => handle_rename(&store, presenter, &recording.parse::<Selector>()?, &new_name).await,
        Commands::Delete { recording } => {
            handle_delete(&store, presenter, &recording.parse::<Selector>()?).await
        }
        Commands::Share { recording } => {
            let share = create_share();
            handle_share(&store, &share, presenter, &recording.parse::<Selector>()?).await
        }
        Commands::Config { .. } => Err(CommandError::Usage("config is handled separately")),
    }
}

async fn select<S: RecordingStore>(
    store: &S,
    selector: &Selector,
) -> Result<Recording, CommandError> {
    let recordings = store.list().await?;
    selector.resolve(&recordings).cloned()
}

async fn handle_list<S: RecordingStore>(
    store: &S,
    presenter: &Presenter,
    json: bool,
) -> Result<(), CommandError> {
    let recordings = store.list().await?;

    if json {
        let entries: Vec<RecordingEntry> = recordings.iter().map(RecordingEntry::from).collect();
        let text = serde_json::to_string_pretty(&entries)
            .map_err(|e| CommandError::Output(e.to_string()))?;
        presenter.output(&text);
    } else {
        presenter.recording_list(&recordings, None);
    }
    Ok(())
}

async fn handle_rename<S: RecordingStore>(
    store: &S,
    presenter: &Presenter,
    selector: &Selector,
    new_name: &str,
) -> Result<(), CommandError> {
    let recording = select(store, selector).await?;
    let renamed = store.rename(&recording, new_name).await?;
    presenter.success(&format!(
        "Renamed {} to {}",
        recording.display_name(),
        renamed.display_name()
    ));
    Ok(())
}

async fn handle_delete<S: RecordingStore>(
    store: &S,
    presenter: &Presenter,
    selector: &Selector,
) -> Result<(), CommandError> {
    let recording = select(store, selector).await?;
    store.delete(&recording).await?;
    presenter.success(&format!("Deleted {}", recording.display_name()));
    Ok(())
}

async fn handle_share<S: RecordingStore, H: Share>(
    store: &S,
    share: &H,
    presenter: &Presenter,
    selector: &Selector,
) -> Result<(), CommandError> {
    let recording = select(store, selector).await?;
    share.share(&recording).await?;
    presenter.success(&format!(
        "Copied path of {} to the clipboard",
        recording.display_name()
    ));
    Ok(())
}

async fn handle_record<S: RecordingStore>(
    store: &S,
    config: &AppConfig,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    let mut shutdown = ShutdownListener::new().map_err(|e| CommandError::Signal(e.to_string()))?;
    let AudioStack {
        recorder,
        mut events,
        ..
    } = AudioStack::new(config);

    let destination = store
        .allocate(&Recording::generated_file_name(SystemTime::now()))
        .await?;
    recorder.start(&destination).await?;

    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    presenter.start_spinner(&format!("Recording {} (Ctrl-C to stop)", name));

    let ended = tokio::select! {
        end = watch_stream(presenter, &mut events, AudioMode::Record, &name) => Some(end),
        _ = shutdown.recv() => None,
    };
    let end = match ended {
        Some(end) => end,
        None => recorder.stop().await?,
    };
    presenter.stop_spinner();

    if let StreamEnd::Failed(reason) = end {
        return Err(CommandError::StreamFailed {
            mode: AudioMode::Record,
            reason,
        });
    }
    presenter.success(&format!("Saved {}", name));
    presenter.output(&destination.display().to_string());
    Ok(())
}

async fn handle_play<S: RecordingStore>(
    store: &S,
    config: &AppConfig,
    presenter: &mut Presenter,
    selector: &Selector,
) -> Result<(), CommandError> {
    let recording = select(store, selector).await?;
    let mut shutdown = ShutdownListener::new().map_err(|e| CommandError::Signal(e.to_string()))?;
    let AudioStack {
        player, mut events, ..
    } = AudioStack::new(config);

    player.play(recording.path()).await?;
    presenter.start_spinner(&format!(
        "Playing {} (Ctrl-C to stop)",
        recording.display_name()
    ));

    let ended = tokio::select! {
        end = watch_stream(presenter, &mut events, AudioMode::Playback, recording.display_name()) => Some(end),
        _ = shutdown.recv() => None,
    };
    let end = match ended {
        Some(end) => end,
        None => player.stop().await?,
    };
    presenter.stop_spinner();

    match end {
        StreamEnd::Failed(reason) => Err(CommandError::StreamFailed {
            mode: AudioMode::Playback,
            reason,
        }),
        _ => Ok(()),
    }
}

/// Animate the spinner until the stream reports its end
async fn watch_stream(
    presenter: &Presenter,
    events: &mut UnboundedReceiver<AudioEvent>,
    mode: AudioMode,
    name: &str,
) -> StreamEnd {
    let mut pulse = Pulse::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(AudioEvent::Finished { end, .. }) => return end,
                Some(AudioEvent::Started { .. }) => {}
                None => return StreamEnd::Stopped,
            },
            _ = frames.tick() => {
                pulse.tick();
                presenter.update_spinner(&presenter.format_activity(
                    mode,
                    name,
                    &pulse.bar(PULSE_WIDTH),
                    None,
                ));
            }
        }
    }
}
