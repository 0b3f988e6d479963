//! Cosmetic animation state for the console
//!
//! Nothing here feeds back into the recorder or player. The pulse bar
//! oscillates while a stream is active and the pressed highlight echoes
//! the last accepted command for a moment.

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

/// Interval between animation frames
pub const FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// How long an accepted command stays highlighted
pub const PRESS_DURATION: Duration = Duration::from_millis(400);

/// Frames in one full pulse cycle
const FRAMES_PER_CYCLE: u32 = 16;

/// Width of the pulse bar in cells
pub const PULSE_WIDTH: usize = 12;

/// Oscillating level meter shown while recording or playing
#[derive(Debug, Default, Clone)]
pub struct Pulse {
    frame: u32,
}

impl Pulse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame
    pub fn tick(&mut self) {
        self.frame = (self.frame + 1) % FRAMES_PER_CYCLE;
    }

    /// Restart from the bottom of the cycle
    pub fn reset(&mut self) {
        self.frame = 0;
    }

    /// Current amplitude in `0.0..=1.0`
    pub fn amplitude(&self) -> f32 {
        let phase = self.frame as f32 / FRAMES_PER_CYCLE as f32;
        (1.0 - (phase * TAU).cos()) / 2.0
    }

    /// Render the pulse as a bar `width` cells wide
    pub fn bar(&self, width: usize) -> String {
        let filled = (self.amplitude() * width as f32).round() as usize;
        let filled = filled.min(width);
        format!("{}{}", "▮".repeat(filled), "▯".repeat(width - filled))
    }
}

/// Highlight for the most recently accepted command
#[derive(Debug, Clone)]
pub struct Pressed {
    label: String,
    until: Instant,
}

impl Pressed {
    /// Highlight `label` starting now
    pub fn new(label: impl Into<String>) -> Self {
        Self::at(label, Instant::now())
    }

    fn at(label: impl Into<String>, now: Instant) -> Self {
        Self {
            label: label.into(),
            until: now + PRESS_DURATION,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Check if the highlight should still be drawn at `now`
    pub fn is_visible(&self, now: Instant) -> bool {
        now < self.until
    }
}
