//! Mouse state.

use glam::{DVec2, IVec2};
use winit::event::{MouseButton, MouseScrollDelta};

use super::DigitalButton;

/// Trackpad pixels that count as one wheel notch.
pub const PIXELS_PER_NOTCH: f64 = 40.0;

/// Turns fractional wheel input into whole notches, carrying the remainder.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelAccumulator {
    remainder: f64,
}

impl WheelAccumulator {
    /// Adds a scroll event and returns the whole notches it completes.
    /// Positive values scroll away from the user.
    pub fn push(&mut self, delta: MouseScrollDelta) -> i32 {
        let notches = match delta {
            MouseScrollDelta::LineDelta(_, y) => y as f64,
            MouseScrollDelta::PixelDelta(position) => position.y / PIXELS_PER_NOTCH,
        };
        self.remainder += notches;
        let whole = self.remainder.trunc();
        self.remainder -= whole;
        whole as i32
    }

    pub fn reset(&mut self) {
        self.remainder = 0.0;
    }
}

/// Mouse buttons, wheel and position in window client coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mouse {
    pub left_button: DigitalButton,
    pub right_button: DigitalButton,
    /// Accumulated wheel notches since start.
    pub wheel: i32,
    /// Wheel notches during the last pull.
    pub delta_wheel: i32,
    /// Cursor position in physical pixels, origin top-left.
    pub position: IVec2,
    /// Raw pointer motion during the last pull.
    pub delta_position: IVec2,

    wheel_accumulator: WheelAccumulator,
    pending_motion: DVec2,
}

impl Mouse {
    /// Clears per-pull deltas and edges before new events are applied.
    pub fn begin_pull(&mut self) {
        self.delta_wheel = 0;
        self.delta_position = IVec2::ZERO;
        self.left_button.clear_transitions();
        self.right_button.clear_transitions();
    }

    /// Folds the events received since [`begin_pull`](Self::begin_pull) into the totals.
    pub fn end_pull(&mut self) {
        self.wheel += self.delta_wheel;
        let whole = self.pending_motion.trunc();
        self.delta_position = whole.as_ivec2();
        self.pending_motion -= whole;
    }

    pub fn on_button(&mut self, button: MouseButton, down: bool) {
        match button {
            MouseButton::Left => self.left_button.update_preserving_transitions(down),
            MouseButton::Right => self.right_button.update_preserving_transitions(down),
            _ => {}
        }
    }

    pub fn on_cursor_moved(&mut self, x: f64, y: f64) {
        self.position = IVec2::new(x as i32, y as i32);
    }

    /// Relative motion reported by the device, unaffected by acceleration or clipping.
    pub fn on_motion(&mut self, dx: f64, dy: f64) {
        self.pending_motion += DVec2::new(dx, dy);
    }

    pub fn on_scroll(&mut self, delta: MouseScrollDelta) {
        self.delta_wheel += self.wheel_accumulator.push(delta);
    }
}
