//! Button and stick state with per-pull edge detection.

/// On/off button.
///
/// `pressed` and `released` report edges relative to the previous pull.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DigitalButton {
    pub down: bool,
    pub pressed: bool,
    pub released: bool,
}

impl DigitalButton {
    /// Sets the state from a poll, replacing any previous edges.
    pub fn update(&mut self, down: bool) {
        let was_down = self.down;
        self.down = down;
        self.pressed = !was_down && down;
        self.released = was_down && !down;
    }

    /// Sets the state from an event, keeping edges already recorded since
    /// the last [`clear_transitions`](Self::clear_transitions).
    ///
    /// A press and release arriving between two pulls therefore report both
    /// `pressed` and `released`.
    pub fn update_preserving_transitions(&mut self, down: bool) {
        let was_down = self.down;
        self.down = down;
        self.pressed |= !was_down && down;
        self.released |= was_down && !down;
    }

    pub fn clear_transitions(&mut self) {
        self.pressed = false;
        self.released = false;
    }
}

/// Analog button (trigger) read as digital past a threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AnalogButton {
    pub threshold: f32,
    pub value: f32,
    pub down: bool,
    pub pressed: bool,
    pub released: bool,
}

impl AnalogButton {
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    pub fn update(&mut self, value: f32) {
        self.value = value;
        let was_down = self.down;
        self.down = value >= self.threshold;
        self.pressed = !was_down && self.down;
        self.released = was_down && !self.down;
    }
}

/// Two-axis stick with a per-axis dead zone.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Stick {
    pub threshold: f32,
    pub x: f32,
    pub y: f32,
}

impl Stick {
    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }

    /// Stores the axes, zeroing any axis whose magnitude is within the threshold.
    pub fn update(&mut self, x: f32, y: f32) {
        self.x = if x.abs() <= self.threshold { 0.0 } else { x };
        self.y = if y.abs() <= self.threshold { 0.0 } else { y };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digital_edges() {
        let mut button = DigitalButton::default();
        button.update(true);
        assert!(button.down && button.pressed && !button.released);

        button.update(true);
        assert!(button.down && !button.pressed && !button.released);

        button.update(false);
        assert!(!button.down && !button.pressed && button.released);

        button.update(false);
        assert_eq!(button, DigitalButton::default());
    }

    #[test]
    fn test_preserving_transitions_keeps_tap() {
        let mut button = DigitalButton::default();
        button.update_preserving_transitions(true);
        button.update_preserving_transitions(false);
        assert!(!button.down);
        assert!(button.pressed);
        assert!(button.released);

        button.clear_transitions();
        assert!(!button.pressed && !button.released);
    }

    #[test]
    fn test_plain_update_loses_tap() {
        let mut button = DigitalButton::default();
        button.update(true);
        button.update(false);
        assert!(!button.pressed);
        assert!(button.released);
    }

    #[test]
    fn test_analog_threshold_is_inclusive() {
        let mut trigger = AnalogButton::with_threshold(0.5);
        trigger.update(0.49);
        assert!(!trigger.down);
        trigger.update(0.5);
        assert!(trigger.down && trigger.pressed);
        assert_eq!(trigger.value, 0.5);
        trigger.update(0.9);
        assert!(trigger.down && !trigger.pressed);
        trigger.update(0.1);
        assert!(!trigger.down && trigger.released);
    }

    #[test]
    fn test_stick_dead_zone_per_axis() {
        let mut stick = Stick::with_threshold(0.2);
        stick.update(0.2, -0.21);
        assert_eq!(stick.x, 0.0);
        assert_eq!(stick.y, -0.21);

        stick.update(-0.1, 0.9);
        assert_eq!(stick.x, 0.0);
        assert_eq!(stick.y, 0.9);
    }
}
