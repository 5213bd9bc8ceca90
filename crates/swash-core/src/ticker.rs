//! Fixed-rate tick source.
//!
//! The host calls [`Ticker::poll`] from whatever timer it has (an
//! animation-frame callback in the browser). The ticker turns that into
//! ticks at the configured frame rate and reports the time since the
//! previous tick.

#[derive(Debug, Clone, PartialEq)]
pub struct Ticker {
    interval_ms: f64,
    last_tick_ms: Option<f64>,
    paused: bool,
    ticks: u64,
}

impl Ticker {
    pub fn new(fps: f64) -> Self {
        Self {
            interval_ms: Self::interval_for(fps),
            last_tick_ms: None,
            paused: false,
            ticks: 0,
        }
    }

    fn interval_for(fps: f64) -> f64 {
        1000.0 / fps.max(1.0)
    }

    /// Change the frame rate. Anything below 1 fps is treated as 1.
    pub fn set_fps(&mut self, fps: f64) {
        self.interval_ms = Self::interval_for(fps);
    }

    pub fn fps(&self) -> f64 {
        1000.0 / self.interval_ms
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// While paused, polls yield nothing. Resuming re-primes the clock so
    /// the paused time is not reported as one huge delta.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.last_tick_ms = None;
        }
    }

    /// Returns the elapsed time since the previous tick if a tick is due.
    /// The first poll only primes the clock.
    pub fn poll(&mut self, now_ms: f64) -> Option<f64> {
        if self.paused {
            return None;
        }
        let Some(last) = self.last_tick_ms else {
            self.last_tick_ms = Some(now_ms);
            return None;
        };

        let delta = now_ms - last;
        // 1ms slack so a 60Hz display driving a 60fps ticker never skips.
        if delta + 1.0 < self.interval_ms {
            return None;
        }
        self.last_tick_ms = Some(now_ms);
        self.ticks += 1;
        Some(delta)
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(crate::layout::GRID_FPS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_poll_primes() {
        let mut t = Ticker::new(60.0);
        assert_eq!(t.poll(1000.0), None);
        assert_eq!(t.ticks(), 0);
    }

    #[test]
    fn ticks_at_interval() {
        let mut t = Ticker::new(60.0);
        t.poll(0.0);
        assert_eq!(t.poll(5.0), None);
        assert_eq!(t.poll(16.0), Some(16.0));
        assert_eq!(t.poll(20.0), None);
        assert_eq!(t.poll(40.0), Some(24.0));
        assert_eq!(t.ticks(), 2);
    }

    #[test]
    fn fps_is_clamped() {
        let mut t = Ticker::new(0.0);
        assert_eq!(t.interval_ms(), 1000.0);
        t.set_fps(50.0);
        assert_eq!(t.interval_ms(), 20.0);
        assert_eq!(t.fps(), 50.0);
    }

    #[test]
    fn pause_suppresses_and_reprimes() {
        let mut t = Ticker::new(10.0);
        t.poll(0.0);
        t.set_paused(true);
        assert_eq!(t.poll(500.0), None);
        t.set_paused(false);
        assert_eq!(t.poll(10_000.0), None);
        assert_eq!(t.poll(10_100.0), Some(100.0));
    }
}
