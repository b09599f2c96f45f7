//! Input handling for keyboard, mouse and gamepad
//!
//! Window events are folded into [`Input`] between two pulls. Event-driven
//! buttons (keys, mouse) keep every edge seen since the previous pull, so a
//! click shorter than a frame still reports `pressed`. The gamepad is
//! polled once per pull.

mod button;
mod gamepad;
mod keyboard;
mod mouse;
mod poller;

pub use button::{AnalogButton, DigitalButton, Stick};
pub use gamepad::{Gamepad, GamepadReading};
pub use keyboard::Keyboard;
pub use mouse::{Mouse, PIXELS_PER_NOTCH, WheelAccumulator};
pub use poller::GamepadPoller;

use serde::{Deserialize, Serialize};

/// Typed text is capped at this many bytes per pull.
pub const MAX_TEXT_BYTES: usize = 256;

/// Input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Trigger value at which it reads as down (0.0-1.0)
    #[serde(default = "default_trigger_threshold")]
    pub trigger_threshold: f32,

    /// Per-axis dead zone for thumb sticks (0.0-1.0)
    #[serde(default = "default_stick_threshold")]
    pub stick_threshold: f32,
}

fn default_trigger_threshold() -> f32 {
    30.0 / 255.0
}
fn default_stick_threshold() -> f32 {
    7849.0 / 32767.0
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            trigger_threshold: default_trigger_threshold(),
            stick_threshold: default_stick_threshold(),
        }
    }
}

/// Everything the application can read about input after a pull.
#[derive(Debug, Clone, Default)]
pub struct Input {
    pub keys: Keyboard,
    pub mouse: Mouse,
    pub gamepad: Gamepad,
    /// Text typed during the last pull.
    pub text: String,
}

impl Input {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            gamepad: Gamepad::new(config),
            ..Self::default()
        }
    }

    /// Resets per-pull state before the new batch of events.
    pub fn begin_pull(&mut self) {
        self.keys.begin_pull();
        self.mouse.begin_pull();
        self.text.clear();
    }

    /// Finishes the pull with the freshly polled gamepad reading.
    pub fn end_pull(&mut self, gamepad: Option<&GamepadReading>) {
        self.mouse.end_pull();
        self.gamepad.update(gamepad);
    }

    /// Appends typed text, dropping what does not fit.
    pub fn on_text(&mut self, text: &str) {
        for c in text.chars() {
            if self.text.len() + c.len_utf8() > MAX_TEXT_BYTES {
                break;
            }
            self.text.push(c);
        }
    }

    /// Whether Escape was typed during the last pull.
    pub fn escape_typed(&self) -> bool {
        self.text.contains('\u{1b}') || self.keys.pressed(winit::keyboard::KeyCode::Escape)
    }
}
