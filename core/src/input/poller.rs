//! Gamepad polling via gilrs.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, GamepadId, Gilrs};

use super::GamepadReading;

/// Tracks the first connected controller and reads it once per pull.
pub struct GamepadPoller {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,
    #[cfg(feature = "gamepad")]
    active: Option<GamepadId>,
}

#[cfg(feature = "gamepad")]
impl GamepadPoller {
    pub fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(g) => Some(g),
            Err(e) => {
                tracing::warn!(
                    "Failed to initialize gamepad support: {}. Gamepads will not be available.",
                    e
                );
                None
            }
        };
        let active = gilrs
            .as_ref()
            .and_then(|g| g.gamepads().next().map(|(id, _)| id));
        if let Some(id) = active {
            tracing::info!("Using gamepad {}", id);
        }
        Self { gilrs, active }
    }

    /// Drains pending gilrs events and reads the active controller.
    pub fn poll(&mut self) -> Option<GamepadReading> {
        let gilrs = self.gilrs.as_mut()?;
        while let Some(event) = gilrs.next_event() {
            match event.event {
                gilrs::EventType::Connected => {
                    if self.active.is_none() {
                        self.active = Some(event.id);
                        tracing::info!("Gamepad {} connected", event.id);
                    }
                }
                gilrs::EventType::Disconnected => {
                    if self.active == Some(event.id) {
                        tracing::info!("Gamepad {} disconnected", event.id);
                        self.active = gilrs.gamepads().next().map(|(id, _)| id);
                    }
                }
                _ => {}
            }
        }

        let gamepad = gilrs.connected_gamepad(self.active?)?;
        let btn = |button: Button| gamepad.is_pressed(button);
        let axis = |axis: Axis| gamepad.value(axis);
        let trigger = |button: Button, axis: Axis| {
            trigger_level(
                gamepad.button_data(button).map(|data| data.value()),
                gamepad.axis_data(axis).map(|data| data.value()),
            )
        };

        Some(GamepadReading {
            a: btn(Button::South),
            b: btn(Button::East),
            x: btn(Button::West),
            y: btn(Button::North),
            left_shoulder: btn(Button::LeftTrigger),
            right_shoulder: btn(Button::RightTrigger),
            dpad_up: btn(Button::DPadUp),
            dpad_down: btn(Button::DPadDown),
            dpad_left: btn(Button::DPadLeft),
            dpad_right: btn(Button::DPadRight),
            left_thumb: btn(Button::LeftThumb),
            right_thumb: btn(Button::RightThumb),
            back: btn(Button::Select),
            start: btn(Button::Start),
            left_trigger: trigger(Button::LeftTrigger2, Axis::LeftZ),
            right_trigger: trigger(Button::RightTrigger2, Axis::RightZ),
            left_stick: (axis(Axis::LeftStickX), axis(Axis::LeftStickY)),
            right_stick: (axis(Axis::RightStickX), axis(Axis::RightStickY)),
        })
    }
}

#[cfg(not(feature = "gamepad"))]
impl GamepadPoller {
    pub fn new() -> Self {
        Self {}
    }

    /// Always disconnected without the `gamepad` feature.
    pub fn poll(&mut self) -> Option<GamepadReading> {
        None
    }
}

impl Default for GamepadPoller {
    fn default() -> Self {
        Self::new()
    }
}

/// Trigger pressure in 0..1.
///
/// gilrs reports pressure on the `*Trigger2` buttons as 0..1. The Z axes are
/// -1..1 and only consulted when the button has never reported. A trigger
/// with neither reading is released.
#[cfg(any(feature = "gamepad", test))]
fn trigger_level(button: Option<f32>, axis: Option<f32>) -> f32 {
    match (button, axis) {
        (Some(value), _) => value.clamp(0.0, 1.0),
        (None, Some(value)) => ((value + 1.0) / 2.0).clamp(0.0, 1.0),
        (None, None) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_prefers_button_pressure() {
        assert_eq!(trigger_level(Some(0.0), Some(0.0)), 0.0);
        assert_eq!(trigger_level(Some(0.75), Some(1.0)), 0.75);
        assert_eq!(trigger_level(Some(1.5), None), 1.0);
    }

    #[test]
    fn test_trigger_axis_fallback() {
        assert_eq!(trigger_level(None, Some(-1.0)), 0.0);
        assert_eq!(trigger_level(None, Some(0.0)), 0.5);
        assert_eq!(trigger_level(None, Some(1.0)), 1.0);
    }

    #[test]
    fn test_unreported_trigger_is_released() {
        let threshold = 30.0 / 255.0;
        assert!(trigger_level(None, None) < threshold);
    }
}
