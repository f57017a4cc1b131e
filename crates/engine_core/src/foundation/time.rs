//! Time management utilities

use std::time::{Duration, Instant};

/// Wall-clock frame timer
///
/// Reports the real time elapsed between consecutive calls to
/// [`FrameTimer::lap`]. The first lap measures from the moment the timer was
/// created.
#[derive(Debug)]
pub struct FrameTimer {
    last_frame: Instant,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTimer {
    /// Create a new timer starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
        }
    }

    /// Close the current frame and return its duration
    pub fn lap(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;
        delta
    }
}
