//! Low-latency test scene.
//!
//! Draws a white marker at the mouse position after the early pull and a
//! magenta one after the late pull. The distance between the two while the
//! mouse moves shows how much the late pull gains. Markers grow while the
//! left button was pressed during the frame. Escape quits.

use tachyon_core::{Color, FramePlatform, FrameState, PacedApp, PullPhase, QuadBatch};

use crate::SceneTarget;

pub const CLEAR_COLOR: Color = [0.60, 0.59, 0.62, 1.0];
pub const EARLY_MARKER_COLOR: Color = [1.0, 1.0, 1.0, 1.0];
pub const LATE_MARKER_COLOR: Color = [1.0, 0.0, 1.0, 1.0];

const MARKER_SIDE: f32 = 8.0;
const PRESSED_MARKER_SIDE: f32 = 32.0;

#[derive(Debug, Default)]
pub struct LatencyScene {
    /// Left-button presses seen by the pulls of the current frame.
    presses: u32,
}

impl LatencyScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws the marker for `phase`. Returns true if Escape was typed.
    pub fn draw_phase(
        &mut self,
        state: &FrameState,
        batch: &mut QuadBatch,
        phase: PullPhase,
    ) -> bool {
        let color = match phase {
            PullPhase::Early => {
                self.presses = 0;
                batch.set_clear_color(CLEAR_COLOR);
                EARLY_MARKER_COLOR
            }
            PullPhase::Late => LATE_MARKER_COLOR,
        };

        let mouse = &state.input.mouse;
        if mouse.left_button.pressed {
            self.presses += 1;
        }
        let side = if self.presses > 0 {
            PRESSED_MARKER_SIDE
        } else {
            MARKER_SIDE
        };
        batch.marker(mouse.position.as_vec2(), side, color);

        state.input.escape_typed()
    }

    pub fn presses(&self) -> u32 {
        self.presses
    }
}

impl<P: FramePlatform + SceneTarget> PacedApp<P> for LatencyScene {
    fn draw(&mut self, platform: &mut P, phase: PullPhase) {
        let (state, batch) = platform.frame_parts();
        if self.draw_phase(state, batch, phase) {
            platform.request_quit();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::time::{Duration, Instant};

    use glam::{IVec2, UVec2, Vec2};
    use tachyon_core::config::PacingConfig;
    use tachyon_core::{DoublePullLoop, Sleeper};

    use super::*;

    struct Pull {
        position: IVec2,
        left_pressed: bool,
        text: &'static str,
    }

    fn at(x: i32, y: i32) -> Pull {
        Pull {
            position: IVec2::new(x, y),
            left_pressed: false,
            text: "",
        }
    }

    struct FakePlatform {
        script: VecDeque<Pull>,
        state: FrameState,
        batch: QuadBatch,
        presented: Vec<QuadBatch>,
        quit: bool,
    }

    impl FakePlatform {
        fn new(script: Vec<Pull>) -> Self {
            Self {
                script: script.into(),
                state: FrameState::default(),
                batch: QuadBatch::new(UVec2::new(200, 100)),
                presented: Vec::new(),
                quit: false,
            }
        }
    }

    impl FramePlatform for FakePlatform {
        fn pull(&mut self) -> bool {
            if self.quit {
                return false;
            }
            let Some(pull) = self.script.pop_front() else {
                return false;
            };
            let input = &mut self.state.input;
            input.begin_pull();
            input.mouse.position = pull.position;
            input.mouse.left_button.pressed = pull.left_pressed;
            input.on_text(pull.text);
            true
        }

        fn push(&mut self) {
            self.presented.push(self.batch.clone());
            self.batch.begin(UVec2::new(200, 100), self.batch.clear_color());
        }

        fn state(&self) -> &FrameState {
            &self.state
        }

        fn request_quit(&mut self) {
            self.quit = true;
        }
    }

    impl SceneTarget for FakePlatform {
        fn frame_parts(&mut self) -> (&FrameState, &mut QuadBatch) {
            (&self.state, &mut self.batch)
        }
    }

    struct NoSleep;

    impl Sleeper for NoSleep {
        fn now(&self) -> Instant {
            Instant::now()
        }

        fn sleep(&mut self, _duration: Duration) {}
    }

    fn run(script: Vec<Pull>) -> FakePlatform {
        let mut platform = FakePlatform::new(script);
        let config = PacingConfig {
            scan_out_wait_ms: 0.0,
            stats_log_interval_secs: 0,
        };
        let mut pacing = DoublePullLoop::with_sleeper(&config, NoSleep);
        pacing.run(&mut platform, &mut LatencyScene::new());
        platform
    }

    /// Top-left corner of the quad starting at `vertex`, in pixels.
    fn corner(batch: &QuadBatch, vertex: usize) -> Vec2 {
        let [x, y] = batch.vertices()[vertex].position;
        Vec2::new((x + 1.0) * 100.0, (1.0 - y) * 50.0)
    }

    fn assert_corner(batch: &QuadBatch, vertex: usize, expected: Vec2) {
        let actual = corner(batch, vertex);
        assert!(
            (actual - expected).length() < 1e-3,
            "vertex {vertex}: {actual} != {expected}"
        );
    }

    #[test]
    fn test_two_markers_per_frame() {
        let platform = run(vec![at(20, 30), at(60, 40)]);

        assert_eq!(platform.presented.len(), 1);
        let frame = &platform.presented[0];
        assert_eq!(frame.clear_color(), CLEAR_COLOR);
        assert_eq!(frame.vertices().len(), 12);
        assert_eq!(frame.vertices()[0].color, EARLY_MARKER_COLOR);
        assert_eq!(frame.vertices()[6].color, LATE_MARKER_COLOR);
        assert_corner(frame, 0, Vec2::new(16.0, 26.0));
        assert_corner(frame, 6, Vec2::new(56.0, 36.0));
    }

    #[test]
    fn test_press_grows_both_markers() {
        let mut pressed = at(50, 50);
        pressed.left_pressed = true;
        let platform = run(vec![pressed, at(50, 50), at(50, 50), at(50, 50)]);

        assert_eq!(platform.presented.len(), 2);
        assert_corner(&platform.presented[0], 0, Vec2::splat(34.0));
        assert_corner(&platform.presented[0], 6, Vec2::splat(34.0));
        // Next frame starts over.
        assert_corner(&platform.presented[1], 0, Vec2::splat(46.0));
    }

    #[test]
    fn test_late_press_grows_late_marker_only() {
        let mut pressed = at(50, 50);
        pressed.left_pressed = true;
        let platform = run(vec![at(50, 50), pressed]);

        let frame = &platform.presented[0];
        assert_corner(frame, 0, Vec2::splat(46.0));
        assert_corner(frame, 6, Vec2::splat(34.0));
    }

    #[test]
    fn test_escape_quits() {
        let mut escape = at(0, 0);
        escape.text = "\u{1b}";
        let platform = run(vec![at(0, 0), escape, at(0, 0), at(0, 0)]);
        assert_eq!(platform.presented.len(), 1);
    }
}
