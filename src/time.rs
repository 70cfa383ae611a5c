//! Frame timing.
//!
//! The simulation is driven by a millisecond timestamp supplied by the caller,
//! the way a browser hands `requestAnimationFrame` a timestamp. [`Clock`] is
//! a convenient source of such timestamps; [`FpsCounter`] turns a stream of
//! them into a frames-per-second figure.
//!
//! # Example
//!
//! ```ignore
//! use plexus::time::{Clock, FpsCounter};
//!
//! let clock = Clock::new();
//! let mut fps = FpsCounter::new();
//!
//! // In your frame loop:
//! let now = clock.now_millis();
//! fps.tick(now);
//! println!("FPS: {}", fps.fps());
//! ```

use std::time::{Duration, Instant};

/// Milliseconds between FPS recalculations.
pub const FPS_WINDOW_MS: f64 = 1000.0;

/// Monotonic millisecond clock starting at zero.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    /// Start a clock at the current instant.
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    /// Milliseconds elapsed since the clock started.
    #[inline]
    pub fn now_millis(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Time elapsed since the clock started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Frames-per-second counter fed with frame timestamps.
///
/// Frames are counted over a window of at least one second; when the window
/// closes the rate is recomputed as `round(frames * 1000 / elapsed_ms)` and a
/// new window starts. Between recalculations [`fps`](Self::fps) keeps
/// reporting the last figure.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    /// Start of the current window, `None` until the first tick.
    window_start: Option<f64>,
    /// Frames counted in the current window.
    frames: u32,
    fps: u32,
    total_frames: u64,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame at `now_millis`.
    ///
    /// Returns `true` when this tick closed a window and updated the rate.
    pub fn tick(&mut self, now_millis: f64) -> bool {
        self.total_frames += 1;
        let start = *self.window_start.get_or_insert(now_millis);

        let elapsed = now_millis - start;
        let mut updated = false;
        if elapsed >= FPS_WINDOW_MS {
            self.fps = (self.frames as f64 * 1000.0 / elapsed).round() as u32;
            self.frames = 0;
            self.window_start = Some(now_millis);
            updated = true;
        }

        self.frames += 1;
        updated
    }

    /// Frames per second as of the last closed window.
    #[inline]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Frames recorded since creation or the last reset.
    #[inline]
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Forget all recorded frames.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_advances() {
        let clock = Clock::new();
        thread::sleep(Duration::from_millis(5));
        assert!(clock.now_millis() >= 5.0);
    }

    #[test]
    fn test_fps_zero_until_window_closes() {
        let mut fps = FpsCounter::new();
        for i in 0..30 {
            assert!(!fps.tick(i as f64 * 16.0));
        }
        assert_eq!(fps.fps(), 0);
        assert_eq!(fps.total_frames(), 30);
    }

    #[test]
    fn test_fps_sixty_hertz() {
        let mut fps = FpsCounter::new();
        let frame = 1000.0 / 60.0;
        let mut updated = false;
        for i in 0..=61 {
            updated |= fps.tick(i as f64 * frame);
        }
        assert!(updated);
        assert_eq!(fps.fps(), 60);
    }

    #[test]
    fn test_fps_slow_frames() {
        let mut fps = FpsCounter::new();
        // Four frames 400ms apart: the window closes at 1200ms after 3 frames.
        fps.tick(0.0);
        fps.tick(400.0);
        fps.tick(800.0);
        assert!(fps.tick(1200.0));
        assert_eq!(fps.fps(), (3.0_f64 * 1000.0 / 1200.0).round() as u32);
    }

    #[test]
    fn test_fps_reset() {
        let mut fps = FpsCounter::new();
        fps.tick(0.0);
        fps.tick(2000.0);
        assert!(fps.fps() > 0);
        fps.reset();
        assert_eq!(fps.fps(), 0);
        assert_eq!(fps.total_frames(), 0);
    }
}
