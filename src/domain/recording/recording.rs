//! Recording entity
//!
//! A recording has no metadata record of its own: the file in the store
//! is the entity. Generated names embed the capture time
//! (`recording_<secs>.<micros>.m4a`), so sorting by file name sorts by age.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local};

use crate::domain::error::InvalidRecordingName;

/// File extension of every recording in the store
pub const RECORDING_EXTENSION: &str = "m4a";

/// Prefix of generated (not yet renamed) recording file names
pub const GENERATED_PREFIX: &str = "recording_";

/// One audio capture, identified by its file in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Recording {
    path: PathBuf,
    file_name: String,
}

impl Recording {
    /// Build a recording from a store path.
    ///
    /// Returns `None` if the path does not carry the recording extension
    /// or has no usable UTF-8 file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let extension = path.extension()?.to_str()?;
        if !extension.eq_ignore_ascii_case(RECORDING_EXTENSION) {
            return None;
        }

        let file_name = path.file_name()?.to_str()?.to_string();
        let stem_len = file_name.len() - extension.len() - 1;
        if stem_len == 0 {
            return None;
        }

        Some(Self { path, file_name })
    }

    /// Full path of the recording file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name including the extension
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Name shown to the user: the file name minus its extension
    pub fn display_name(&self) -> &str {
        let stem_len = self.file_name.len() - RECORDING_EXTENSION.len() - 1;
        &self.file_name[..stem_len]
    }

    /// Capture time embedded in a generated name.
    ///
    /// Renamed recordings no longer carry it and return `None`.
    pub fn captured_at(&self) -> Option<DateTime<Local>> {
        let stamp = self.display_name().strip_prefix(GENERATED_PREFIX)?;
        let (secs, fraction) = stamp.split_once('.').unwrap_or((stamp, "0"));
        let secs: i64 = secs.parse().ok()?;

        // Normalise the fraction to nanoseconds regardless of its length
        let digits: String = fraction.chars().take(9).collect();
        let nanos: u32 = format!("{:0<9}", digits).parse().ok()?;

        DateTime::from_timestamp(secs, nanos).map(|utc| utc.with_timezone(&Local))
    }

    /// Generate the file name for a capture started at `at`
    pub fn generated_file_name(at: SystemTime) -> String {
        let since_epoch = at.duration_since(UNIX_EPOCH).unwrap_or_default();
        format!(
            "{}{}.{:06}.{}",
            GENERATED_PREFIX,
            since_epoch.as_secs(),
            since_epoch.subsec_micros(),
            RECORDING_EXTENSION
        )
    }

    /// File name for a rename to the user-chosen `base_name`.
    ///
    /// The extension is fixed; the base name must be usable as a single
    /// path component and must not be all digits, which would read as a
    /// list index.
    pub fn renamed_file_name(base_name: &str) -> Result<String, InvalidRecordingName> {
        let invalid = base_name.trim().is_empty()
            || base_name == "."
            || base_name == ".."
            || base_name.contains(['/', '\\'])
            || base_name.chars().any(char::is_control)
            || base_name.chars().all(|c| c.is_ascii_digit());

        if invalid {
            return Err(InvalidRecordingName {
                input: base_name.to_string(),
            });
        }

        Ok(format!("{}.{}", base_name, RECORDING_EXTENSION))
    }
}

impl fmt::Display for Recording {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Sort recordings by descending file name (newest capture first)
pub fn sort_newest_first(recordings: &mut [Recording]) {
    recordings.sort_by(|a, b| b.file_name.cmp(&a.file_name));
}
