//! Monotonic clock and per-pull time snapshot.

use std::time::{Duration, Instant};

/// Clock ticks per second. Ticks are nanoseconds.
pub const TICKS_PER_SECOND: u64 = 1_000_000_000;

/// Time since the platform started, refreshed on every pull.
///
/// Absolute values count from the clock origin; `delta_*` values count from
/// the previous pull.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Time {
    pub ticks: u64,
    pub nanoseconds: u64,
    pub microseconds: u64,
    pub milliseconds: u64,
    pub seconds: f32,

    pub delta_ticks: u64,
    pub delta_nanoseconds: u64,
    pub delta_microseconds: u64,
    pub delta_milliseconds: u64,
    pub delta_seconds: f32,
}

impl Time {
    /// Moves to `elapsed` since the origin.
    ///
    /// An `elapsed` earlier than the current time is stored as-is with a zero
    /// delta, so consumers comparing successive timestamps can detect it.
    pub fn advance_to(&mut self, elapsed: Duration) {
        let ticks = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        let delta_ticks = ticks.saturating_sub(self.ticks);

        self.delta_ticks = delta_ticks;
        self.delta_nanoseconds = delta_ticks;
        self.delta_microseconds = delta_ticks / 1_000;
        self.delta_milliseconds = delta_ticks / 1_000_000;
        self.delta_seconds = (delta_ticks as f64 / TICKS_PER_SECOND as f64) as f32;

        self.ticks = ticks;
        self.nanoseconds = ticks;
        self.microseconds = ticks / 1_000;
        self.milliseconds = ticks / 1_000_000;
        self.seconds = (ticks as f64 / TICKS_PER_SECOND as f64) as f32;
    }

    /// Delta since the previous pull in milliseconds, at full precision.
    pub fn delta_ms_f64(&self) -> f64 {
        self.delta_ticks as f64 / 1_000_000.0
    }
}

/// Monotonic clock with a fixed origin.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn origin(&self) -> Instant {
        self.origin
    }

    pub fn elapsed(&self) -> Duration {
        self.origin.elapsed()
    }

    /// Refreshes `time` from the clock.
    pub fn pull(&self, time: &mut Time) {
        time.advance_to(self.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_derives_units() {
        let mut time = Time::default();
        time.advance_to(Duration::from_micros(2_500_750));

        assert_eq!(time.ticks, 2_500_750_000);
        assert_eq!(time.nanoseconds, 2_500_750_000);
        assert_eq!(time.microseconds, 2_500_750);
        assert_eq!(time.milliseconds, 2_500);
        assert!((time.seconds - 2.50075).abs() < 1e-6);
        assert_eq!(time.delta_ticks, time.ticks);
    }

    #[test]
    fn test_delta_between_pulls() {
        let mut time = Time::default();
        time.advance_to(Duration::from_millis(100));
        time.advance_to(Duration::from_millis(116));

        assert_eq!(time.delta_milliseconds, 16);
        assert_eq!(time.delta_microseconds, 16_000);
        assert!((time.delta_seconds - 0.016).abs() < 1e-6);
        assert!((time.delta_ms_f64() - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_backward_step_keeps_timestamp() {
        let mut time = Time::default();
        time.advance_to(Duration::from_millis(50));
        time.advance_to(Duration::from_millis(40));

        assert_eq!(time.milliseconds, 40);
        assert_eq!(time.delta_ticks, 0);
    }

    #[test]
    fn test_clock_is_monotonic() {
        let clock = Clock::start();
        let mut time = Time::default();
        clock.pull(&mut time);
        let first = time.ticks;
        clock.pull(&mut time);
        assert!(time.ticks >= first);
    }
}
