//! Double-pull frame pacing.
//!
//! Each frame pulls input, draws, sleeps until just before scan-out, pulls
//! again, draws what changed and pushes. The late pull lets the final image
//! reflect input only a few milliseconds old.

mod sleep;
mod stats;

use std::time::Duration;

use tracing::info;

use crate::config::PacingConfig;
use crate::state::FrameState;

pub use sleep::{Sleeper, ThreadSleeper, sleep_at_least};
pub use stats::{FrameStats, MinMax, TimingAnomaly};

/// Default wait between the early pull and the late pull.
pub const DEFAULT_SCAN_OUT_WAIT_MS: f64 = 15.0;

/// Wheel notches that double (or zero) the scan-out wait.
const WHEEL_NOTCHES_PER_DOUBLING: f64 = 16.0;

/// Pull/push surface the loop drives.
pub trait FramePlatform {
    /// Refreshes input, time and window state. Returns false once quitting.
    fn pull(&mut self) -> bool;

    /// Presents the frame.
    fn push(&mut self);

    fn state(&self) -> &FrameState;

    fn request_quit(&mut self);
}

/// Which pull a draw call follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PullPhase {
    Early,
    Late,
}

/// Application side of the loop.
pub trait PacedApp<P: FramePlatform + ?Sized> {
    fn draw(&mut self, platform: &mut P, phase: PullPhase);
}

/// Scan-out wait, adjustable with the mouse wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanOutPacer {
    wait_ms: f64,
}

impl ScanOutPacer {
    pub fn new(wait_ms: f64) -> Self {
        Self {
            wait_ms: wait_ms.max(0.0),
        }
    }

    pub fn wait_ms(&self) -> f64 {
        self.wait_ms
    }

    pub fn wait(&self) -> Duration {
        Duration::from_nanos((self.wait_ms * 1_000_000.0).round() as u64)
    }

    /// Scales the wait by `1 + delta_wheel / 16`, floored at zero.
    /// Returns whether the wait changed.
    pub fn apply_wheel(&mut self, delta_wheel: i32) -> bool {
        if delta_wheel == 0 {
            return false;
        }
        let step = self.wait_ms * delta_wheel as f64 / WHEEL_NOTCHES_PER_DOUBLING;
        self.wait_ms = (self.wait_ms + step).max(0.0);
        info!("scan_out_wait_ms: {:.3}", self.wait_ms);
        true
    }
}

impl Default for ScanOutPacer {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_OUT_WAIT_MS)
    }
}

/// Outcome of one [`DoublePullLoop::frame`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub anomaly: Option<TimingAnomaly>,
    pub slept: Duration,
}

/// Drives a [`FramePlatform`] and a [`PacedApp`] through the double-pull protocol.
pub struct DoublePullLoop<S: Sleeper = ThreadSleeper> {
    pacer: ScanOutPacer,
    stats: FrameStats,
    sleeper: S,
}

impl DoublePullLoop<ThreadSleeper> {
    pub fn new(config: &PacingConfig) -> Self {
        Self::with_sleeper(config, ThreadSleeper)
    }
}

impl<S: Sleeper> DoublePullLoop<S> {
    pub fn with_sleeper(config: &PacingConfig, sleeper: S) -> Self {
        let stats = FrameStats::new(
            Duration::from_secs(config.stats_log_interval_secs),
            sleeper.now(),
        );
        Self {
            pacer: ScanOutPacer::new(config.scan_out_wait_ms),
            stats,
            sleeper,
        }
    }

    pub fn pacer(&self) -> &ScanOutPacer {
        &self.pacer
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Runs frames until the platform quits, then logs a final summary.
    pub fn run<P, A>(&mut self, platform: &mut P, app: &mut A)
    where
        P: FramePlatform + ?Sized,
        A: PacedApp<P> + ?Sized,
    {
        while self.frame(platform, app).is_some() {}
        self.stats.log_summary();
    }

    /// Runs one frame. Returns `None` without drawing if the first pull quits.
    pub fn frame<P, A>(&mut self, platform: &mut P, app: &mut A) -> Option<FrameReport>
    where
        P: FramePlatform + ?Sized,
        A: PacedApp<P> + ?Sized,
    {
        if !platform.pull() {
            return None;
        }
        let anomaly = self.stats.begin_frame(&platform.state().time);
        self.pacer
            .apply_wheel(platform.state().input.mouse.delta_wheel);
        app.draw(platform, PullPhase::Early);

        let slept = sleep_at_least(&mut self.sleeper, self.pacer.wait());

        // A quit seen here ends the loop on the next frame's first pull.
        platform.pull();
        self.stats.record_late_pull(&platform.state().time);
        self.pacer
            .apply_wheel(platform.state().input.mouse.delta_wheel);
        app.draw(platform, PullPhase::Late);

        platform.push();
        self.stats.maybe_log(self.sleeper.now());

        Some(FrameReport { anomaly, slept })
    }
}

#[cfg(test)]
mod tests;
