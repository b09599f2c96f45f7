//! Double-pull loop tests against a scripted platform.

use std::collections::VecDeque;
use std::time::Duration;

use super::sleep::tests::FakeSleeper;
use super::*;
use crate::config::PacingConfig;

// ============================================================================
// Scripted platform
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Event {
    Pull(u64),
    Draw(PullPhase, i32),
    Push,
}

/// One scripted pull: timestamp in ms and wheel notches.
#[derive(Clone, Copy)]
struct Step {
    ms: u64,
    wheel: i32,
}

fn steps(ms: &[u64]) -> VecDeque<Step> {
    ms.iter().map(|&ms| Step { ms, wheel: 0 }).collect()
}

struct ScriptedPlatform {
    script: VecDeque<Step>,
    state: FrameState,
    events: Vec<Event>,
    quit: bool,
}

impl ScriptedPlatform {
    fn new(script: VecDeque<Step>) -> Self {
        Self {
            script,
            state: FrameState::default(),
            events: Vec::new(),
            quit: false,
        }
    }
}

impl FramePlatform for ScriptedPlatform {
    fn pull(&mut self) -> bool {
        if self.quit {
            return false;
        }
        let Some(step) = self.script.pop_front() else {
            return false;
        };
        self.state.time.advance_to(Duration::from_millis(step.ms));
        self.state.input.mouse.delta_wheel = step.wheel;
        self.events.push(Event::Pull(step.ms));
        true
    }

    fn push(&mut self) {
        self.events.push(Event::Push);
    }

    fn state(&self) -> &FrameState {
        &self.state
    }

    fn request_quit(&mut self) {
        self.quit = true;
    }
}

/// Records draws; quits after `quit_after` late draws.
#[derive(Default)]
struct RecordingApp {
    quit_after: Option<usize>,
    late_draws: usize,
}

impl PacedApp<ScriptedPlatform> for RecordingApp {
    fn draw(&mut self, platform: &mut ScriptedPlatform, phase: PullPhase) {
        let wheel = platform.state().input.mouse.delta_wheel;
        platform.events.push(Event::Draw(phase, wheel));
        if phase == PullPhase::Late {
            self.late_draws += 1;
            if self.quit_after == Some(self.late_draws) {
                platform.request_quit();
            }
        }
    }
}

fn pacing(wait_ms: f64) -> PacingConfig {
    PacingConfig {
        scan_out_wait_ms: wait_ms,
        stats_log_interval_secs: 0,
    }
}

// ============================================================================
// Protocol
// ============================================================================

#[test]
fn test_frame_protocol_order() {
    let mut platform = ScriptedPlatform::new(steps(&[0, 15]));
    let mut app = RecordingApp::default();
    let mut pacing_loop =
        DoublePullLoop::with_sleeper(&pacing(15.0), FakeSleeper::new(Duration::from_secs(1)));

    let report = pacing_loop.frame(&mut platform, &mut app).unwrap();

    assert_eq!(
        platform.events,
        vec![
            Event::Pull(0),
            Event::Draw(PullPhase::Early, 0),
            Event::Pull(15),
            Event::Draw(PullPhase::Late, 0),
            Event::Push,
        ]
    );
    assert_eq!(report.slept, Duration::from_millis(15));
    assert_eq!(report.anomaly, None);
}

#[test]
fn test_quit_on_first_pull_draws_nothing() {
    let mut platform = ScriptedPlatform::new(VecDeque::new());
    let mut app = RecordingApp::default();
    let mut pacing_loop =
        DoublePullLoop::with_sleeper(&pacing(15.0), FakeSleeper::new(Duration::from_secs(1)));

    assert!(pacing_loop.frame(&mut platform, &mut app).is_none());
    assert!(platform.events.is_empty());
}

#[test]
fn test_run_stops_after_request_quit() {
    let mut platform = ScriptedPlatform::new(steps(&[0, 15, 33, 48, 66, 81]));
    let mut app = RecordingApp {
        quit_after: Some(2),
        ..Default::default()
    };
    let mut pacing_loop =
        DoublePullLoop::with_sleeper(&pacing(15.0), FakeSleeper::new(Duration::from_secs(1)));

    pacing_loop.run(&mut platform, &mut app);

    assert_eq!(app.late_draws, 2);
    assert_eq!(pacing_loop.stats().frames(), 2);
    let pushes = platform.events.iter().filter(|e| **e == Event::Push).count();
    assert_eq!(pushes, 2);
}

#[test]
fn test_interrupted_sleep_waits_full_duration() {
    let mut platform = ScriptedPlatform::new(steps(&[0, 15]));
    let mut app = RecordingApp::default();
    let mut pacing_loop =
        DoublePullLoop::with_sleeper(&pacing(15.0), FakeSleeper::new(Duration::from_millis(2)));

    let report = pacing_loop.frame(&mut platform, &mut app).unwrap();

    assert!(report.slept >= Duration::from_millis(15));
    assert_eq!(pacing_loop.sleeper().sleeps, 8);
}

// ============================================================================
// Diagnostics
// ============================================================================

#[test]
fn test_backward_time_detected_exactly_once() {
    // Frames start at 0, 33, 20 (backward) and 53.
    let mut platform = ScriptedPlatform::new(steps(&[0, 15, 33, 48, 20, 35, 53, 68]));
    let mut app = RecordingApp::default();
    let mut pacing_loop =
        DoublePullLoop::with_sleeper(&pacing(15.0), FakeSleeper::new(Duration::from_secs(1)));

    let mut anomalies = Vec::new();
    while let Some(report) = pacing_loop.frame(&mut platform, &mut app) {
        anomalies.push(report.anomaly);
    }

    assert_eq!(
        anomalies,
        vec![
            None,
            None,
            Some(TimingAnomaly {
                previous_ms: 33,
                current_ms: 20
            }),
            None
        ]
    );
    let stats = pacing_loop.stats();
    assert_eq!(stats.anomalies(), 1);
    assert_eq!(stats.frame_period_ms().min(), Some(33));
    assert_eq!(stats.frame_period_ms().max(), Some(33));
    assert_eq!(stats.pull_to_pull_ms().min(), Some(15.0));
    assert_eq!(stats.pull_to_pull_ms().max(), Some(15.0));
    assert_eq!(stats.push_to_pull_ms().min(), Some(18.0));
    assert_eq!(stats.push_to_pull_ms().max(), Some(18.0));
}

// ============================================================================
// Scan-out wait
// ============================================================================

#[test]
fn test_wheel_scales_wait() {
    let mut pacer = ScanOutPacer::new(16.0);
    assert!(!pacer.apply_wheel(0));
    assert!(pacer.apply_wheel(1));
    assert_eq!(pacer.wait_ms(), 17.0);
    assert!(pacer.apply_wheel(-16));
    assert_eq!(pacer.wait_ms(), 0.0);
}

#[test]
fn test_wheel_never_goes_negative() {
    let mut pacer = ScanOutPacer::new(15.0);
    pacer.apply_wheel(-40);
    assert_eq!(pacer.wait_ms(), 0.0);
    assert_eq!(pacer.wait(), Duration::ZERO);
}

#[test]
fn test_default_wait() {
    let pacer = ScanOutPacer::default();
    assert_eq!(pacer.wait(), Duration::from_millis(15));
}

#[test]
fn test_wheel_applied_after_both_pulls() {
    let script = VecDeque::from(vec![Step { ms: 0, wheel: 16 }, Step { ms: 30, wheel: -8 }]);
    let mut platform = ScriptedPlatform::new(script);
    let mut app = RecordingApp::default();
    let mut pacing_loop =
        DoublePullLoop::with_sleeper(&pacing(15.0), FakeSleeper::new(Duration::from_secs(1)));

    let report = pacing_loop.frame(&mut platform, &mut app).unwrap();

    // Doubled before sleeping, then halved after the late pull.
    assert_eq!(report.slept, Duration::from_millis(30));
    assert_eq!(pacing_loop.pacer().wait_ms(), 15.0);
}
