//! Recording store adapters

mod fs;

pub use fs::FsRecordingStore;
