//! Console command parsing
//!
//! Recordings are addressed by their 1-based position in the last
//! rendered list, or by display name.

use std::fmt;
use std::str::FromStr;

use super::error::CommandError;
use crate::domain::recording::Recording;

/// How a command refers to a recording
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// 1-based list position
    Index(usize),
    /// Display name (file name without extension)
    Name(String),
}

impl Selector {
    /// Find the selected recording in `recordings`.
    ///
    /// An index past the end of the list falls back to a name match, so a
    /// file named `2024.m4a` is still reachable as `2024`.
    pub fn resolve<'a>(&self, recordings: &'a [Recording]) -> Result<&'a Recording, CommandError> {
        let found = match self {
            Self::Index(index) => index
                .checked_sub(1)
                .and_then(|i| recordings.get(i))
                .or_else(|| find_by_name(recordings, &index.to_string())),
            Self::Name(name) => find_by_name(recordings, name),
        };
        found.ok_or_else(|| CommandError::UnknownRecording(self.to_string()))
    }
}

fn find_by_name<'a>(recordings: &'a [Recording], name: &str) -> Option<&'a Recording> {
    recordings
        .iter()
        .find(|r| r.display_name() == name || r.file_name() == name)
}

impl FromStr for Selector {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CommandError::Usage("a recording index or name is required"));
        }
        Ok(match s.parse::<usize>() {
            Ok(index) => Self::Index(index),
            Err(_) => Self::Name(s.to_string()),
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{}", index),
            Self::Name(name) => write!(f, "{}", name),
        }
    }
}

/// A console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Record,
    Stop,
    Play(Selector),
    Rename { target: Selector, new_name: String },
    Delete(Selector),
    Share(Selector),
    Theme,
    List,
    Help,
    Quit,
}

impl Command {
    /// Short label used for the pressed highlight
    pub fn label(&self) -> &'static str {
        match self {
            Self::Record => "record",
            Self::Stop => "stop",
            Self::Play(_) => "play",
            Self::Rename { .. } => "rename",
            Self::Delete(_) => "delete",
            Self::Share(_) => "share",
            Self::Theme => "theme",
            Self::List => "list",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

/// Reject trailing arguments on commands that take none
fn no_args(command: Command, rest: &str) -> Result<Command, CommandError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::Usage("this command takes no arguments"))
    }
}

impl FromStr for Command {
    type Err = CommandError;

    /// Parse one input line.
    ///
    /// The rest of the line after `play`, `delete` and `share` is the
    /// selector, so names may contain spaces. `rename` takes a
    /// single-word selector followed by the new name.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_lowercase().as_str() {
            "record" | "rec" | "r" => no_args(Self::Record, rest),
            "stop" | "s" => no_args(Self::Stop, rest),
            "play" | "p" => Ok(Self::Play(rest.parse()?)),
            "delete" | "rm" => Ok(Self::Delete(rest.parse()?)),
            "share" => Ok(Self::Share(rest.parse()?)),
            "rename" | "mv" => {
                let (target, new_name) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage("rename <index|name> <new name>"))?;
                Ok(Self::Rename {
                    target: target.parse()?,
                    new_name: new_name.trim().to_string(),
                })
            }
            "theme" => no_args(Self::Theme, rest),
            "list" | "ls" => no_args(Self::List, rest),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            _ => Err(CommandError::UnknownCommand(verb.to_string())),
        }
    }
}

/// Help text listing the console commands
pub const HELP: &[(&str, &str)] = &[
    ("record", "start a new recording"),
    ("stop", "stop recording or playback"),
    ("play <n|name>", "play a recording"),
    ("rename <n|name> <new name>", "rename a recording"),
    ("delete <n|name>", "delete a recording"),
    ("share <n|name>", "copy a recording's path to the clipboard"),
    ("theme", "switch between dark and light"),
    ("list", "reload the recording list"),
    ("help", "show this help"),
    ("quit", "leave the console"),
];
