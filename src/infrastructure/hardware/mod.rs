//! Audio hardware adapters

mod cpal;

pub use self::cpal::CpalHardware;
