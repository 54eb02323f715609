use instant::{Duration, Instant};

const WINDOW: Duration = Duration::from_millis(1000);

/// Windowed frames-per-second estimator.
///
/// Frames are counted until at least one second has passed since the window
/// started; the rate is then computed from the actual elapsed time and the
/// window restarts.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frame_count: u32,
    window_start: Instant,
    rate: Option<u32>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            frame_count: 0,
            window_start: start,
            rate: None,
        }
    }

    /// Counts one frame; returns the new rate when a window closes.
    pub fn tick(&mut self) -> Option<u32> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<u32> {
        self.frame_count += 1;
        self.sample_at(now)
    }

    /// Closes the window if it is due, without counting a frame.
    pub fn sample_at(&mut self, now: Instant) -> Option<u32> {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < WINDOW {
            return None;
        }
        let rate = (self.frame_count as f64 / elapsed.as_secs_f64()).round() as u32;
        self.frame_count = 0;
        self.window_start = now;
        self.rate = Some(rate);
        Some(rate)
    }

    /// The last emitted rate.
    pub fn rate(&self) -> Option<u32> {
        self.rate
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
