//! Time management utilities

use std::time::Instant;

/// Frame clock producing the `(delta_time, elapsed_time)` pair fed to
/// [`ViewerSession::advance`](crate::session::ViewerSession::advance)
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer from the wall clock (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.step(elapsed.as_secs_f32());
    }

    /// Advance the timer by a fixed amount instead of reading the wall clock
    ///
    /// Used by headless runs and tests that need deterministic frames.
    pub fn step(&mut self, delta_time: f32) {
        self.delta_time = delta_time.max(0.0);
        self.total_time += self.delta_time;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_steps_accumulate() {
        let mut timer = Timer::new();
        for _ in 0..60 {
            timer.step(1.0 / 60.0);
        }
        assert_eq!(timer.frame_count(), 60);
        assert!((timer.total_time() - 1.0).abs() < 1e-4);
        assert!((timer.average_fps() - 60.0).abs() < 0.1);
    }

    #[test]
    fn test_negative_step_is_ignored() {
        let mut timer = Timer::new();
        timer.step(-1.0);
        assert_eq!(timer.delta_time(), 0.0);
        assert_eq!(timer.total_time(), 0.0);
    }
}
