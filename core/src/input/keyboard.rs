//! Keyboard state keyed by physical key.

use hashbrown::HashMap;
use winit::keyboard::KeyCode;

use super::DigitalButton;

/// Per-key button state. Keys never seen read as released.
#[derive(Debug, Clone, Default)]
pub struct Keyboard {
    keys: HashMap<KeyCode, DigitalButton>,
}

impl Keyboard {
    pub fn begin_pull(&mut self) {
        for button in self.keys.values_mut() {
            button.clear_transitions();
        }
    }

    /// Applies a key event. Auto-repeat events do not produce new presses.
    pub fn on_key(&mut self, key: KeyCode, down: bool) {
        self.keys
            .entry(key)
            .or_default()
            .update_preserving_transitions(down);
    }

    /// Releases every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        for button in self.keys.values_mut() {
            if button.down {
                button.update_preserving_transitions(false);
            }
        }
    }

    pub fn key(&self, key: KeyCode) -> DigitalButton {
        self.keys.get(&key).copied().unwrap_or_default()
    }

    pub fn is_down(&self, key: KeyCode) -> bool {
        self.key(key).down
    }

    pub fn pressed(&self, key: KeyCode) -> bool {
        self.key(key).pressed
    }

    pub fn released(&self, key: KeyCode) -> bool {
        self.key(key).released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_is_up() {
        let keyboard = Keyboard::default();
        assert_eq!(keyboard.key(KeyCode::KeyA), DigitalButton::default());
    }

    #[test]
    fn test_repeat_does_not_repress() {
        let mut keyboard = Keyboard::default();
        keyboard.begin_pull();
        keyboard.on_key(KeyCode::Space, true);
        assert!(keyboard.pressed(KeyCode::Space));

        keyboard.begin_pull();
        keyboard.on_key(KeyCode::Space, true);
        assert!(keyboard.is_down(KeyCode::Space));
        assert!(!keyboard.pressed(KeyCode::Space));
    }

    #[test]
    fn test_release_all() {
        let mut keyboard = Keyboard::default();
        keyboard.on_key(KeyCode::KeyW, true);
        keyboard.on_key(KeyCode::KeyS, true);
        keyboard.begin_pull();
        keyboard.release_all();
        assert!(keyboard.released(KeyCode::KeyW));
        assert!(keyboard.released(KeyCode::KeyS));
        assert!(!keyboard.is_down(KeyCode::KeyW));
    }
}
