//! Frame timer used by the draw loop.

use std::time::{Duration, Instant};

/// Measures wall time across a sequence of frames.
#[derive(Debug)]
pub struct Timer {
    start: Instant,
    last_tick: Instant,
    frames: u64,
}

impl Timer {
    /// Create a new timer, starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            frames: 0,
        }
    }

    /// Total elapsed time since the timer was created or last reset.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Marks the end of a frame and returns the time since the previous one.
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now - self.last_tick;
        self.last_tick = now;
        self.frames += 1;
        delta
    }

    /// Number of frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Mean frame time in seconds, or zero before the first tick.
    pub fn average_frame_secs(&self) -> f32 {
        if self.frames == 0 {
            return 0.0;
        }
        (self.last_tick - self.start).as_secs_f32() / self.frames as f32
    }

    /// Reset the timer to the current time and clear the frame count.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
