//! Keyboard input encoding
//!
//! Raw key identifiers are looked up in a [`KeyBinding`] and folded into an
//! 8-bit [`ButtonMask`], which is what the engine consumes.

mod encoder;
mod keyboard_mapping;
#[cfg(test)]
mod tests;

pub use encoder::ButtonEncoder;
pub use keyboard_mapping::KeyBinding;

use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Packed state of every held button, one bit per button.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ButtonMask: u8 {
        const A = 0b0000_0001;
        const B = 0b0000_0010;
        const START = 0b0000_0100;
        const SELECT = 0b0000_1000;
        const UP = 0b0001_0000;
        const DOWN = 0b0010_0000;
        const LEFT = 0b0100_0000;
        const RIGHT = 0b1000_0000;
    }
}

/// A single controller button.
///
/// The set is fixed; only the key that drives each button is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    A,
    B,
    Start,
    Select,
    Up,
    Down,
    Left,
    Right,
}

impl Button {
    /// All buttons in bit order
    pub const ALL: [Button; 8] = [
        Button::A,
        Button::B,
        Button::Start,
        Button::Select,
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
    ];

    /// The mask bit this button occupies
    pub const fn mask(self) -> ButtonMask {
        match self {
            Button::A => ButtonMask::A,
            Button::B => ButtonMask::B,
            Button::Start => ButtonMask::START,
            Button::Select => ButtonMask::SELECT,
            Button::Up => ButtonMask::UP,
            Button::Down => ButtonMask::DOWN,
            Button::Left => ButtonMask::LEFT,
            Button::Right => ButtonMask::RIGHT,
        }
    }

    /// Config-file name of the button
    pub const fn name(self) -> &'static str {
        match self {
            Button::A => "a",
            Button::B => "b",
            Button::Start => "start",
            Button::Select => "select",
            Button::Up => "up",
            Button::Down => "down",
            Button::Left => "left",
            Button::Right => "right",
        }
    }
}
