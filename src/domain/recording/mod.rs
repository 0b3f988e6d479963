//! Recording domain: the file-backed recording entity and its encoding

mod encoding;
mod recording;

pub use encoding::{EncoderQuality, EncodingSettings, AUDIO_CODEC, CONTAINER_FORMAT};
pub use recording::{sort_newest_first, Recording, GENERATED_PREFIX, RECORDING_EXTENSION};
