//! State published to the application on every pull.

use glam::{IVec2, UVec2};

use crate::input::Input;
use crate::time::Time;

/// Window geometry as of the last pull.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowState {
    pub title: String,
    /// Client area origin on screen, in physical pixels.
    pub position: IVec2,
    /// Client area size in physical pixels.
    pub size: UVec2,
    /// Whether the size changed during the last pull.
    pub resized: bool,
}

/// Window, input and time after a pull.
#[derive(Debug, Clone, Default)]
pub struct FrameState {
    pub window: WindowState,
    pub input: Input,
    pub time: Time,
}
