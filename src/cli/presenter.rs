//! CLI presenter for output formatting
//!
//! Status and diagnostics go to stderr, listings and values to stdout.
//! While the activity spinner is running every line is printed through
//! it so the two never interleave.

use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::recording::Recording;
use crate::domain::session::AudioMode;
use crate::domain::theme::Theme;

/// Colors used for one theme
#[derive(Debug, Clone, Copy)]
struct Palette {
    accent: Color,
    muted: Color,
    recording: Color,
    playing: Color,
    pressed_fg: Color,
    pressed_bg: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                accent: Color::BrightCyan,
                muted: Color::BrightBlack,
                recording: Color::BrightRed,
                playing: Color::BrightGreen,
                pressed_fg: Color::Black,
                pressed_bg: Color::BrightCyan,
            },
            Theme::Light => Self {
                accent: Color::Blue,
                muted: Color::BrightBlack,
                recording: Color::Red,
                playing: Color::Green,
                pressed_fg: Color::White,
                pressed_bg: Color::Blue,
            },
        }
    }
}

/// Presenter for CLI output formatting
pub struct Presenter {
    theme: Theme,
    palette: Palette,
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter with the default theme
    pub fn new() -> Self {
        Self::with_theme(Theme::default())
    }

    /// Create a presenter drawing with `theme`
    pub fn with_theme(theme: Theme) -> Self {
        Self {
            theme,
            palette: Palette::for_theme(theme),
            spinner: None,
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switch colors for everything drawn from now on
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.palette = Palette::for_theme(theme);
        if let Some(ref spinner) = self.spinner {
            spinner.set_style(self.spinner_style());
        }
    }

    fn spinner_style(&self) -> ProgressStyle {
        let template = if self.theme.is_dark() {
            "{spinner:.cyan} {msg}"
        } else {
            "{spinner:.blue} {msg}"
        };
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        self.stop_spinner();
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(self.spinner_style());
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    pub fn is_spinner_active(&self) -> bool {
        self.spinner.is_some()
    }

    /// Print a line to stderr without tearing the spinner
    fn status(&self, line: String) {
        match self.spinner {
            Some(ref spinner) => spinner.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.status(format!("{} {}", "ℹ".color(self.palette.accent), message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        self.status(format!("{} {}", "✓".green(), message));
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        self.status(format!("{} {}", "⚠".yellow(), message));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.status(format!("{} {}", "✗".red(), message));
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        match self.spinner {
            Some(ref spinner) => spinner.suspend(|| println!("{}", text)),
            None => println!("{}", text),
        }
    }

    /// Output text to stdout without newline
    pub fn output_inline(&self, text: &str) {
        print!("{}", text);
        let _ = io::stdout().flush();
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        self.output(&format!("{}: {}", key.color(self.palette.accent), value));
    }

    /// Echo an accepted command as a pressed button
    pub fn pressed(&self, label: &str) {
        self.status(self.format_pressed(label));
    }

    fn format_pressed(&self, label: &str) -> String {
        format!(" {} ", label)
            .color(self.palette.pressed_fg)
            .on_color(self.palette.pressed_bg)
            .bold()
            .to_string()
    }

    /// Format the activity line shown next to the spinner
    pub fn format_activity(
        &self,
        mode: AudioMode,
        name: &str,
        pulse_bar: &str,
        pressed: Option<&str>,
    ) -> String {
        let (tag, color) = match mode {
            AudioMode::Record => ("REC", self.palette.recording),
            AudioMode::Playback => ("PLAY", self.palette.playing),
        };
        let mut line = format!(
            "{} {} {}",
            tag.color(color).bold(),
            pulse_bar.color(color),
            name
        );
        if let Some(label) = pressed {
            line.push(' ');
            line.push_str(&self.format_pressed(label));
        }
        line
    }

    /// Format one row of the recording list
    pub fn format_recording_row(&self, index: usize, recording: &Recording, playing: bool) -> String {
        let number = format!("{:>3}.", index).color(self.palette.muted);
        let name = if playing {
            format!("{} ▶", recording.display_name())
                .color(self.palette.playing)
                .bold()
        } else {
            recording.display_name().normal()
        };
        match recording.captured_at() {
            Some(at) => format!(
                "{} {}  {}",
                number,
                name,
                at.format("%Y-%m-%d %H:%M:%S")
                    .to_string()
                    .color(self.palette.muted)
            ),
            None => format!("{} {}", number, name),
        }
    }

    /// Print the recording list, marking the one currently playing
    pub fn recording_list(&self, recordings: &[Recording], playing: Option<&Path>) {
        if recordings.is_empty() {
            self.status(format!("{}", "No recordings yet".color(self.palette.muted)));
            return;
        }
        for (i, recording) in recordings.iter().enumerate() {
            let is_playing = playing == Some(recording.path());
            self.output(&self.format_recording_row(i + 1, recording, is_playing));
        }
    }

    /// Print the console help
    pub fn help(&self, entries: &[(&str, &str)]) {
        let width = entries.iter().map(|(usage, _)| usage.len()).max().unwrap_or(0);
        for (usage, description) in entries {
            self.output(&format!(
                "  {}  {}",
                format!("{:<width$}", usage, width = width).color(self.palette.accent),
                description
            ));
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
