use std::time::{Duration, Instant};

/// Timing numbers handed to the app each frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,

    /// Seconds since the clock started. Unclamped; meant for driving
    /// animations that should track wall time.
    pub elapsed: f32,

    /// Frame counter, starting at zero and never repeating.
    pub frame_index: u64,
}

/// Produces [`FrameTime`] snapshots, one per rendered frame.
///
/// Delta time is clamped from above so a debugger pause or a minimized window
/// does not feed one enormous step into animation code.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_max_dt(Duration::from_millis(250))
    }

    /// Creates a clock with a custom upper clamp on delta time.
    pub fn with_max_dt(dt_max: Duration) -> Self {
        let now = Instant::now();
        Self { start: now, last: now, frame_index: 0, dt_max }
    }

    /// Resets the delta-time baseline without touching elapsed time or the
    /// frame counter. Useful after a long stall the caller knows about, such
    /// as surface reconfiguration.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    /// Advances the clock and returns this frame's snapshot.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        let dt = now.saturating_duration_since(self.last).min(self.dt_max);
        self.last = now;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            elapsed: now.saturating_duration_since(self.start).as_secs_f32(),
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_index_counts_up() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn dt_is_clamped_by_max() {
        let mut clock = FrameClock::with_max_dt(Duration::from_millis(1));
        std::thread::sleep(Duration::from_millis(5));
        assert!(clock.tick().dt <= 0.001 + f32::EPSILON);
    }

    #[test]
    fn elapsed_is_monotonic() {
        let mut clock = FrameClock::new();
        let a = clock.tick().elapsed;
        let b = clock.tick().elapsed;
        assert!(b >= a);
    }
}
