//! Interactive console view
//!
//! Composes the recorder, player, recording store and share target
//! behind typed commands. Errors are printed and leave every component
//! as it was.

use std::path::{Path, PathBuf};
use std::time::{Instant, SystemTime};

use tracing::debug;

use super::animation::{Pressed, Pulse, PULSE_WIDTH};
use super::commands::{Command, Selector, HELP};
use super::error::CommandError;
use super::presenter::Presenter;
use crate::application::ports::{
    CaptureBackend, PlaybackBackend, RecordingStore, Share, StreamEnd,
};
use crate::application::{AudioEvent, Player, Recorder};
use crate::domain::recording::Recording;
use crate::domain::session::AudioMode;
use crate::domain::theme::Theme;

/// Whether the console keeps running after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The stream currently animated in the status line
#[derive(Debug, Clone)]
struct Activity {
    mode: AudioMode,
    path: PathBuf,
    name: String,
}

/// Interactive console state
pub struct Console<C, P, S, H>
where
    C: CaptureBackend,
    P: PlaybackBackend,
    S: RecordingStore,
    H: Share,
{
    recorder: Recorder<C>,
    player: Player<P>,
    store: S,
    share: H,
    presenter: Presenter,
    recordings: Vec<Recording>,
    activity: Option<Activity>,
    pulse: Pulse,
    pressed: Option<Pressed>,
}

impl<C, P, S, H> Console<C, P, S, H>
where
    C: CaptureBackend,
    P: PlaybackBackend,
    S: RecordingStore,
    H: Share,
{
    pub fn new(
        recorder: Recorder<C>,
        player: Player<P>,
        store: S,
        share: H,
        presenter: Presenter,
    ) -> Self {
        Self {
            recorder,
            player,
            store,
            share,
            presenter,
            recordings: Vec::new(),
            activity: None,
            pulse: Pulse::new(),
            pressed: None,
        }
    }

    /// Recordings as last rendered
    pub fn recordings(&self) -> &[Recording] {
        &self.recordings
    }

    /// Current process-lifetime theme
    pub fn theme(&self) -> Theme {
        self.presenter.theme()
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    /// Re-read the store, hiding the file still being captured.
    ///
    /// On failure the previous list is kept.
    pub async fn reload(&mut self) -> Result<(), CommandError> {
        let mut recordings = self.store.list().await?;
        if let Some(capturing) = self.recorder.current_path().await {
            recordings.retain(|r| r.path() != capturing);
        }
        self.recordings = recordings;
        Ok(())
    }

    /// Reload and print the list
    pub async fn show_list(&mut self) -> Result<(), CommandError> {
        self.reload().await?;
        let playing = self.player.now_playing().await;
        self.presenter
            .recording_list(&self.recordings, playing.as_deref());
        Ok(())
    }

    /// Run a command, printing any error
    pub async fn handle(&mut self, command: Command) -> Flow {
        self.pressed = Some(Pressed::new(command.label()));
        self.presenter.pressed(command.label());

        match self.execute(command).await {
            Ok(flow) => flow,
            Err(e) => {
                self.presenter.error(&e.to_string());
                Flow::Continue
            }
        }
    }

    /// Run a command
    pub async fn execute(&mut self, command: Command) -> Result<Flow, CommandError> {
        debug!(?command, "console command");
        match command {
            Command::Record => self.record().await?,
            Command::Stop => self.stop().await?,
            Command::Play(selector) => self.play(&selector).await?,
            Command::Rename { target, new_name } => self.rename(&target, &new_name).await?,
            Command::Delete(selector) => self.delete(&selector).await?,
            Command::Share(selector) => self.share(&selector).await?,
            Command::Theme => self.toggle_theme(),
            Command::List => self.show_list().await?,
            Command::Help => self.presenter.help(HELP),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    async fn record(&mut self) -> Result<(), CommandError> {
        let file_name = Recording::generated_file_name(SystemTime::now());
        let destination = self.store.allocate(&file_name).await?;
        self.recorder.start(&destination).await?;
        Ok(())
    }

    async fn stop(&mut self) -> Result<(), CommandError> {
        if self.recorder.is_recording().await {
            let end = self.recorder.stop().await?;
            debug!(%end, "recording stopped");
            // The finished event prints the refreshed list
            self.reload().await
        } else if self.player.is_playing().await {
            self.player.stop().await?;
            Ok(())
        } else {
            Err(CommandError::NothingToStop)
        }
    }

    fn selected(&self, selector: &Selector) -> Result<Recording, CommandError> {
        selector.resolve(&self.recordings).cloned()
    }

    async fn play(&mut self, selector: &Selector) -> Result<(), CommandError> {
        let recording = self.selected(selector)?;
        self.player.play(recording.path()).await?;
        Ok(())
    }

    async fn rename(&mut self, selector: &Selector, new_name: &str) -> Result<(), CommandError> {
        let recording = self.selected(selector)?;
        let renamed = self.store.rename(&recording, new_name).await?;
        self.presenter.success(&format!(
            "Renamed {} to {}",
            recording.display_name(),
            renamed.display_name()
        ));
        self.show_list().await
    }

    async fn delete(&mut self, selector: &Selector) -> Result<(), CommandError> {
        let recording = self.selected(selector)?;
        if self.player.now_playing().await.as_deref() == Some(recording.path()) {
            self.player.stop().await?;
        }
        self.store.delete(&recording).await?;
        self.presenter
            .success(&format!("Deleted {}", recording.display_name()));
        self.show_list().await
    }

    async fn share(&mut self, selector: &Selector) -> Result<(), CommandError> {
        let recording = self.selected(selector)?;
        self.share.share(&recording).await?;
        self.presenter.success(&format!(
            "Copied path of {} to the clipboard",
            recording.display_name()
        ));
        Ok(())
    }

    fn toggle_theme(&mut self) {
        let theme = self.presenter.theme().toggled();
        self.presenter.set_theme(theme);
        self.presenter.info(&format!("Theme: {}", theme));
    }

    /// React to a recorder or player state change
    pub async fn handle_event(&mut self, event: AudioEvent) {
        match event {
            AudioEvent::Started { mode, path } => {
                let name = display_name(&path);
                self.pulse.reset();
                self.activity = Some(Activity { mode, path, name });
                self.presenter.start_spinner(&self.activity_line());
            }
            AudioEvent::Finished { mode, path, end } => {
                // A later stream may already have replaced this one
                if self
                    .activity
                    .as_ref()
                    .is_some_and(|a| a.mode == mode && a.path == path)
                {
                    self.activity = None;
                    self.presenter.stop_spinner();
                }
                self.report_end(mode, &path, &end);

                if mode == AudioMode::Record {
                    if let Err(e) = self.show_list().await {
                        self.presenter.error(&e.to_string());
                    }
                }
            }
        }
    }

    fn report_end(&self, mode: AudioMode, path: &Path, end: &StreamEnd) {
        let name = display_name(path);
        match (mode, end) {
            (_, StreamEnd::Failed(reason)) => self
                .presenter
                .warn(&format!("{} of {} failed: {}", mode_noun(mode), name, reason)),
            (AudioMode::Record, _) => self.presenter.success(&format!("Saved {}", name)),
            (AudioMode::Playback, StreamEnd::Completed) => {
                self.presenter.info(&format!("Finished playing {}", name))
            }
            (AudioMode::Playback, StreamEnd::Stopped) => {
                self.presenter.info(&format!("Stopped {}", name))
            }
        }
    }

    /// Advance the animation by one frame
    pub fn tick(&mut self) {
        if self
            .pressed
            .as_ref()
            .is_some_and(|p| !p.is_visible(Instant::now()))
        {
            self.pressed = None;
        }
        if self.activity.is_some() {
            self.pulse.tick();
            self.presenter.update_spinner(&self.activity_line());
        }
    }

    fn activity_line(&self) -> String {
        match self.activity {
            Some(ref activity) => self.presenter.format_activity(
                activity.mode,
                &activity.name,
                &self.pulse.bar(PULSE_WIDTH),
                self.pressed.as_ref().map(|p| p.label()),
            ),
            None => String::new(),
        }
    }

    /// Stop whatever is running before the console exits
    pub async fn shutdown(&mut self) {
        if self.recorder.is_recording().await {
            match self.recorder.stop().await {
                Ok(_) => self.presenter.success("Recording saved"),
                Err(e) => self.presenter.error(&e.to_string()),
            }
        }
        if self.player.is_playing().await {
            let _ = self.player.stop().await;
        }
        self.presenter.stop_spinner();
    }
}

fn display_name(path: &Path) -> String {
    Recording::from_path(path)
        .map(|r| r.display_name().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn mode_noun(mode: AudioMode) -> &'static str {
    match mode {
        AudioMode::Record => "Recording",
        AudioMode::Playback => "Playback",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::application::ports::{ShareError, StoreError};
    use crate::application::test_support::{MockHardware, ScriptedBackend};
    use crate::application::{EventSink, SessionManager};
    use crate::domain::session::Session;

    /// Store keeping file names in memory; `allocate` creates the entry
    /// the way a capture would
    #[derive(Clone, Default)]
    struct MemoryStore {
        files: Arc<Mutex<Vec<String>>>,
    }

    impl MemoryStore {
        fn with(names: &[&str]) -> Self {
            let store = Self::default();
            store
                .files
                .lock()
                .unwrap()
                .extend(names.iter().map(|n| n.to_string()));
            store
        }

        fn names(&self) -> Vec<String> {
            self.files.lock().unwrap().clone()
        }
    }

    fn path_of(file_name: &str) -> PathBuf {
        PathBuf::from("/notes").join(file_name)
    }

    #[async_trait]
    impl RecordingStore for MemoryStore {
        async fn list(&self) -> Result<Vec<Recording>, StoreError> {
            let mut list: Vec<Recording> = self
                .names()
                .iter()
                .filter_map(|n| Recording::from_path(path_of(n)))
                .collect();
            crate::domain::recording::sort_newest_first(&mut list);
            Ok(list)
        }

        async fn delete(&self, recording: &Recording) -> Result<(), StoreError> {
            let mut files = self.files.lock().unwrap();
            let before = files.len();
            files.retain(|n| n != recording.file_name());
            if files.len() == before {
                return Err(StoreError::NotFound(recording.file_name().to_string()));
            }
            Ok(())
        }

        async fn rename(
            &self,
            recording: &Recording,
            new_base_name: &str,
        ) -> Result<Recording, StoreError> {
            let file_name = Recording::renamed_file_name(new_base_name)?;
            let mut files = self.files.lock().unwrap();
            if files.contains(&file_name) {
                return Err(StoreError::NameCollision(new_base_name.to_string()));
            }
            let slot = files
                .iter_mut()
                .find(|n| n.as_str() == recording.file_name())
                .ok_or_else(|| StoreError::NotFound(recording.file_name().to_string()))?;
            *slot = file_name.clone();
            Ok(Recording::from_path(path_of(&file_name)).unwrap())
        }

        async fn allocate(&self, file_name: &str) -> Result<PathBuf, StoreError> {
            self.files.lock().unwrap().push(file_name.to_string());
            Ok(path_of(file_name))
        }
    }

    #[derive(Clone, Default)]
    struct RecordingShare {
        shared: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Share for RecordingShare {
        async fn share(&self, recording: &Recording) -> Result<(), ShareError> {
            self.shared
                .lock()
                .unwrap()
                .push(recording.file_name().to_string());
            Ok(())
        }
    }

    type TestConsole = Console<ScriptedBackend, ScriptedBackend, MemoryStore, RecordingShare>;

    fn console(store: MemoryStore) -> (TestConsole, ScriptedBackend, RecordingShare) {
        let backend = ScriptedBackend::new();
        let share = RecordingShare::default();
        let sessions = SessionManager::new(MockHardware::new());
        let session = Session::shared();
        let recorder = Recorder::new(
            backend.clone(),
            sessions.clone(),
            session.clone(),
            EventSink::discard(),
        );
        let player = Player::new(backend.clone(), sessions, session, EventSink::discard());
        let console = Console::new(recorder, player, store, share.clone(), Presenter::new());
        (console, backend, share)
    }

    fn shown(console: &TestConsole) -> Vec<&str> {
        console
            .recordings()
            .iter()
            .map(|r| r.display_name())
            .collect()
    }

    #[tokio::test]
    async fn recording_in_progress_is_hidden_until_stopped() {
        let store = MemoryStore::with(&["recording_1.000000.m4a"]);
        let (mut console, _backend, _share) = console(store.clone());

        console.execute(Command::Record).await.unwrap();
        assert_eq!(store.names().len(), 2);
        console.reload().await.unwrap();
        assert_eq!(shown(&console), vec!["recording_1.000000"]);

        console.execute(Command::Stop).await.unwrap();
        assert_eq!(console.recordings().len(), 2);
        assert_ne!(shown(&console)[0], "recording_1.000000");
    }

    #[tokio::test]
    async fn stop_with_nothing_running_fails() {
        let (mut console, _backend, _share) = console(MemoryStore::default());
        let err = console.execute(Command::Stop).await.unwrap_err();
        assert!(matches!(err, CommandError::NothingToStop));
    }

    #[tokio::test]
    async fn play_while_recording_is_rejected() {
        let store = MemoryStore::with(&["a.m4a"]);
        let (mut console, backend, _share) = console(store);
        console.reload().await.unwrap();

        console.execute(Command::Record).await.unwrap();
        let err = console
            .execute(Command::Play(Selector::Index(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, CommandError::Audio(_)));
        assert_eq!(backend.starts(), 1);
        assert!(console.recorder.is_recording().await);
    }

    #[tokio::test]
    async fn deleting_the_playing_recording_stops_playback() {
        let store = MemoryStore::with(&["a.m4a", "b.m4a"]);
        let (mut console, _backend, _share) = console(store.clone());
        console.reload().await.unwrap();

        console
            .execute(Command::Play(Selector::Name("a".to_string())))
            .await
            .unwrap();
        assert!(console.player.is_playing().await);

        console
            .execute(Command::Delete(Selector::Name("a".to_string())))
            .await
            .unwrap();

        assert!(!console.player.is_playing().await);
        assert_eq!(store.names(), vec!["b.m4a".to_string()]);
        assert_eq!(shown(&console), vec!["b"]);
    }

    #[tokio::test]
    async fn rename_refreshes_the_list() {
        let store = MemoryStore::with(&["recording_1.000000.m4a"]);
        let (mut console, _backend, _share) = console(store);
        console.reload().await.unwrap();

        console
            .execute(Command::Rename {
                target: Selector::Index(1),
                new_name: "Groceries".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(shown(&console), vec!["Groceries"]);
    }

    #[tokio::test]
    async fn failed_rename_leaves_list_unchanged() {
        let store = MemoryStore::with(&["a.m4a", "b.m4a"]);
        let (mut console, _backend, _share) = console(store.clone());
        console.reload().await.unwrap();

        let err = console
            .execute(Command::Rename {
                target: Selector::Name("a".to_string()),
                new_name: "b".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CommandError::Store(StoreError::NameCollision(_))
        ));
        assert_eq!(shown(&console), vec!["b", "a"]);
        assert_eq!(store.names().len(), 2);
    }

    #[tokio::test]
    async fn unknown_selector_is_reported() {
        let (mut console, _backend, share) = console(MemoryStore::with(&["a.m4a"]));
        console.reload().await.unwrap();

        let err = console
            .execute(Command::Share(Selector::Index(5)))
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::UnknownRecording(_)));
        assert!(share.shared.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn share_hands_over_the_selected_file() {
        let (mut console, _backend, share) = console(MemoryStore::with(&["a.m4a", "b.m4a"]));
        console.reload().await.unwrap();

        console
            .execute(Command::Share(Selector::Index(2)))
            .await
            .unwrap();
        assert_eq!(*share.shared.lock().unwrap(), vec!["a.m4a".to_string()]);
    }

    #[tokio::test]
    async fn theme_toggles_for_the_session() {
        let (mut console, _backend, _share) = console(MemoryStore::default());
        assert_eq!(console.theme(), Theme::Dark);

        console.execute(Command::Theme).await.unwrap();
        assert_eq!(console.theme(), Theme::Light);
        console.execute(Command::Theme).await.unwrap();
        assert_eq!(console.theme(), Theme::Dark);
    }

    #[tokio::test]
    async fn quit_ends_the_loop() {
        let (mut console, _backend, _share) = console(MemoryStore::default());
        assert_eq!(console.handle(Command::Quit).await, Flow::Quit);
        assert_eq!(console.handle(Command::Help).await, Flow::Continue);
    }

    #[tokio::test]
    async fn errors_do_not_end_the_loop() {
        let (mut console, _backend, _share) = console(MemoryStore::default());
        assert_eq!(console.handle(Command::Stop).await, Flow::Continue);
    }

    #[tokio::test]
    async fn runtime_failure_event_clears_activity() {
        let (mut console, _backend, _share) = console(MemoryStore::default());
        let path = path_of("a.m4a");

        console
            .handle_event(AudioEvent::Started {
                mode: AudioMode::Playback,
                path: path.clone(),
            })
            .await;
        assert!(console.activity.is_some());

        console
            .handle_event(AudioEvent::Finished {
                mode: AudioMode::Playback,
                path,
                end: StreamEnd::Failed("decoder error".to_string()),
            })
            .await;
        assert!(console.activity.is_none());
        assert!(!console.presenter().is_spinner_active());
    }

    #[tokio::test]
    async fn stale_finished_event_keeps_newer_activity() {
        let (mut console, _backend, _share) = console(MemoryStore::default());

        console
            .handle_event(AudioEvent::Started {
                mode: AudioMode::Playback,
                path: path_of("b.m4a"),
            })
            .await;
        console
            .handle_event(AudioEvent::Finished {
                mode: AudioMode::Playback,
                path: path_of("a.m4a"),
                end: StreamEnd::Stopped,
            })
            .await;

        assert_eq!(console.activity.as_ref().map(|a| a.name.as_str()), Some("b"));
    }
}
