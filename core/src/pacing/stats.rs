//! Frame timing diagnostics.

use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::time::Time;

/// Running minimum and maximum of a series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MinMax<T> {
    range: Option<(T, T)>,
}

impl<T: Copy + PartialOrd> MinMax<T> {
    pub fn new() -> Self {
        Self { range: None }
    }

    pub fn record(&mut self, value: T) {
        self.range = Some(match self.range {
            None => (value, value),
            Some((min, max)) => (
                if value < min { value } else { min },
                if value > max { value } else { max },
            ),
        });
    }

    pub fn min(&self) -> Option<T> {
        self.range.map(|(min, _)| min)
    }

    pub fn max(&self) -> Option<T> {
        self.range.map(|(_, max)| max)
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_none()
    }
}

/// A frame timestamp earlier than the previous frame's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingAnomaly {
    pub previous_ms: u64,
    pub current_ms: u64,
}

/// Min/max of frame period and pull waits, with a periodic log summary.
#[derive(Debug, Clone)]
pub struct FrameStats {
    frame_period_ms: MinMax<u64>,
    pull_to_pull_ms: MinMax<f64>,
    push_to_pull_ms: MinMax<f64>,
    last_frame_ms: Option<u64>,
    last_pull_ticks: Option<u64>,
    frames: u64,
    anomalies: u64,
    log_interval: Duration,
    last_log: Instant,
}

impl FrameStats {
    /// `log_interval` of zero disables [`maybe_log`](Self::maybe_log).
    pub fn new(log_interval: Duration, now: Instant) -> Self {
        Self {
            frame_period_ms: MinMax::new(),
            pull_to_pull_ms: MinMax::new(),
            push_to_pull_ms: MinMax::new(),
            last_frame_ms: None,
            last_pull_ticks: None,
            frames: 0,
            anomalies: 0,
            log_interval,
            last_log: now,
        }
    }

    /// Records the first pull of a frame.
    ///
    /// A timestamp earlier than the previous frame's, or than the previous
    /// late pull, is logged and returned without touching any range.
    pub fn begin_frame(&mut self, time: &Time) -> Option<TimingAnomaly> {
        let frame_ms = time.milliseconds;
        let mut anomaly = None;

        if let Some(previous_ms) = self.last_frame_ms {
            if frame_ms < previous_ms || self.went_backwards(time) {
                let previous_ms = if frame_ms < previous_ms {
                    previous_ms
                } else {
                    self.last_pull_ticks.map_or(previous_ms, |ticks| ticks / 1_000_000)
                };
                error!("Frame timestamp went backwards: {} < {}", frame_ms, previous_ms);
                self.anomalies += 1;
                anomaly = Some(TimingAnomaly {
                    previous_ms,
                    current_ms: frame_ms,
                });
            } else {
                self.frame_period_ms.record(frame_ms - previous_ms);
                self.push_to_pull_ms.record(time.delta_ms_f64());
            }
        }

        self.last_frame_ms = Some(frame_ms);
        self.last_pull_ticks = Some(time.ticks);
        self.frames += 1;
        anomaly
    }

    /// Records the second pull of a frame; `time.delta_*` spans the wait.
    ///
    /// A late pull earlier than the first pull is logged and counted but not
    /// recorded.
    pub fn record_late_pull(&mut self, time: &Time) {
        if self.went_backwards(time) {
            error!(
                "Late pull timestamp went backwards: {}ns < {}ns",
                time.ticks,
                self.last_pull_ticks.unwrap_or_default()
            );
            self.anomalies += 1;
        } else {
            self.pull_to_pull_ms.record(time.delta_ms_f64());
        }
        self.last_pull_ticks = Some(time.ticks);
    }

    fn went_backwards(&self, time: &Time) -> bool {
        self.last_pull_ticks.is_some_and(|last| time.ticks < last)
    }

    pub fn frame_period_ms(&self) -> MinMax<u64> {
        self.frame_period_ms
    }

    pub fn pull_to_pull_ms(&self) -> MinMax<f64> {
        self.pull_to_pull_ms
    }

    pub fn push_to_pull_ms(&self) -> MinMax<f64> {
        self.push_to_pull_ms
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn anomalies(&self) -> u64 {
        self.anomalies
    }

    /// Logs a summary if the interval has elapsed. Returns whether it logged.
    pub fn maybe_log(&mut self, now: Instant) -> bool {
        if self.log_interval.is_zero() || now.duration_since(self.last_log) < self.log_interval {
            return false;
        }
        self.log_summary();
        self.last_log = now;
        true
    }

    pub fn log_summary(&self) {
        let fmt_u64 = |v: Option<u64>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
        let fmt_f64 = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"));
        info!(
            "Frame stats: frames={}, period={}..{}ms, pull-to-pull={}..{}ms, push-to-pull={}..{}ms, anomalies={}",
            self.frames,
            fmt_u64(self.frame_period_ms.min()),
            fmt_u64(self.frame_period_ms.max()),
            fmt_f64(self.pull_to_pull_ms.min()),
            fmt_f64(self.pull_to_pull_ms.max()),
            fmt_f64(self.push_to_pull_ms.min()),
            fmt_f64(self.push_to_pull_ms.max()),
            self.anomalies
        );
    }
}
