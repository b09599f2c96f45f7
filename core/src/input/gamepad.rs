//! Gamepad state.

use super::{AnalogButton, DigitalButton, InputConfig, Stick};

/// Raw controller reading for one pull, before thresholds and edge detection.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GamepadReading {
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
    pub left_shoulder: bool,
    pub right_shoulder: bool,
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub left_thumb: bool,
    pub right_thumb: bool,
    pub back: bool,
    pub start: bool,
    /// 0.0 (released) to 1.0 (fully pulled)
    pub left_trigger: f32,
    pub right_trigger: f32,
    /// -1.0 to 1.0, up is positive
    pub left_stick: (f32, f32),
    pub right_stick: (f32, f32),
}

/// First connected controller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Gamepad {
    pub connected: bool,
    pub a_button: DigitalButton,
    pub b_button: DigitalButton,
    pub x_button: DigitalButton,
    pub y_button: DigitalButton,
    pub left_trigger: AnalogButton,
    pub right_trigger: AnalogButton,
    pub left_shoulder_button: DigitalButton,
    pub right_shoulder_button: DigitalButton,
    pub up_button: DigitalButton,
    pub down_button: DigitalButton,
    pub left_button: DigitalButton,
    pub right_button: DigitalButton,
    pub left_thumb_stick: Stick,
    pub right_thumb_stick: Stick,
    pub left_thumb_button: DigitalButton,
    pub right_thumb_button: DigitalButton,
    pub back_button: DigitalButton,
    pub start_button: DigitalButton,
}

impl Gamepad {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            left_trigger: AnalogButton::with_threshold(config.trigger_threshold),
            right_trigger: AnalogButton::with_threshold(config.trigger_threshold),
            left_thumb_stick: Stick::with_threshold(config.stick_threshold),
            right_thumb_stick: Stick::with_threshold(config.stick_threshold),
            ..Self::default()
        }
    }

    /// Applies a reading, or releases everything when no controller is connected.
    pub fn update(&mut self, reading: Option<&GamepadReading>) {
        self.connected = reading.is_some();
        let r = reading.copied().unwrap_or_default();

        self.a_button.update(r.a);
        self.b_button.update(r.b);
        self.x_button.update(r.x);
        self.y_button.update(r.y);
        self.left_shoulder_button.update(r.left_shoulder);
        self.right_shoulder_button.update(r.right_shoulder);
        self.up_button.update(r.dpad_up);
        self.down_button.update(r.dpad_down);
        self.left_button.update(r.dpad_left);
        self.right_button.update(r.dpad_right);
        self.left_thumb_button.update(r.left_thumb);
        self.right_thumb_button.update(r.right_thumb);
        self.back_button.update(r.back);
        self.start_button.update(r.start);
        self.left_trigger.update(r.left_trigger);
        self.right_trigger.update(r.right_trigger);
        self.left_thumb_stick.update(r.left_stick.0, r.left_stick.1);
        self.right_thumb_stick.update(r.right_stick.0, r.right_stick.1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thresholds_from_config() {
        let config = InputConfig {
            trigger_threshold: 0.25,
            stick_threshold: 0.1,
        };
        let pad = Gamepad::new(&config);
        assert_eq!(pad.left_trigger.threshold, 0.25);
        assert_eq!(pad.right_thumb_stick.threshold, 0.1);
    }

    #[test]
    fn test_update_applies_reading() {
        let mut pad = Gamepad::new(&InputConfig::default());
        let reading = GamepadReading {
            a: true,
            dpad_left: true,
            right_trigger: 1.0,
            left_stick: (0.8, 0.05),
            ..GamepadReading::default()
        };
        pad.update(Some(&reading));

        assert!(pad.connected);
        assert!(pad.a_button.pressed);
        assert!(pad.left_button.down);
        assert!(pad.right_trigger.down);
        assert_eq!(pad.left_thumb_stick.x, 0.8);
        assert_eq!(pad.left_thumb_stick.y, 0.0);
    }

    #[test]
    fn test_disconnect_releases_buttons() {
        let mut pad = Gamepad::new(&InputConfig::default());
        pad.update(Some(&GamepadReading {
            start: true,
            ..GamepadReading::default()
        }));
        pad.update(None);
        assert!(!pad.connected);
        assert!(pad.start_button.released);
        assert!(!pad.start_button.down);
    }
}
