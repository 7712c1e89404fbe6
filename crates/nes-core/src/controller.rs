//! Controller input handling
//!
//! A single standard controller packed into one byte. Bit positions are
//! part of the host contract:
//!
//! | bit | button |
//! |-----|--------|
//! | 0 | Right |
//! | 1 | Left |
//! | 2 | Down |
//! | 3 | Up |
//! | 4 | Select |
//! | 5 | Start |
//! | 6 | B |
//! | 7 | A |

/// Controller buttons, discriminant is the bit index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Right = 0,
    Left = 1,
    Down = 2,
    Up = 3,
    Select = 4,
    Start = 5,
    B = 6,
    A = 7,
}

impl Button {
    /// Every button in bit order
    pub const ALL: [Button; 8] = [
        Button::Right,
        Button::Left,
        Button::Down,
        Button::Up,
        Button::Select,
        Button::Start,
        Button::B,
        Button::A,
    ];

    /// Map a host-supplied index to a button; anything outside 0..=7 is rejected
    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Parse a button name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        let button = match name.to_ascii_lowercase().as_str() {
            "right" => Button::Right,
            "left" => Button::Left,
            "down" => Button::Down,
            "up" => Button::Up,
            "select" => Button::Select,
            "start" => Button::Start,
            "b" => Button::B,
            "a" => Button::A,
            _ => return None,
        };
        Some(button)
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn mask(self) -> u8 {
        1 << (self as u8)
    }
}

impl std::str::FromStr for Button {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Button::from_name(s).ok_or_else(|| {
            format!("unknown button '{}' (right, left, down, up, select, start, b, a)", s)
        })
    }
}

/// Standard controller state
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Controller {
    buttons: u8,
}

impl Controller {
    pub fn new() -> Self {
        Self { buttons: 0 }
    }

    pub fn set_button(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.buttons |= button.mask();
        } else {
            self.buttons &= !button.mask();
        }
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        self.buttons & button.mask() != 0
    }

    /// Raw bitfield
    pub fn buttons(&self) -> u8 {
        self.buttons
    }

    /// Release every button
    pub fn clear(&mut self) {
        self.buttons = 0;
    }
}
