//! Numeric door keypad.
//!
//! The keypad owns its own input buffer and lock state; side effects of a
//! press (unlocking the linked door, cues, the error flash timeout) are
//! applied by [`systems::keypad`](crate::systems::keypad).

use arrayvec::ArrayString;
use bevy_ecs::prelude::{Component, Entity};
use log::debug;
use std::fmt;

/// Maximum number of digits the keypad accepts.
pub const KEYPAD_DIGITS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadKey {
    Digit(u8),
    Clear,
    Enter,
}

impl KeypadKey {
    /// Physical button layout, row by row.
    pub const LAYOUT: [KeypadKey; 12] = [
        KeypadKey::Digit(1),
        KeypadKey::Digit(2),
        KeypadKey::Digit(3),
        KeypadKey::Digit(4),
        KeypadKey::Digit(5),
        KeypadKey::Digit(6),
        KeypadKey::Digit(7),
        KeypadKey::Digit(8),
        KeypadKey::Digit(9),
        KeypadKey::Clear,
        KeypadKey::Digit(0),
        KeypadKey::Enter,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "CLR" => Some(KeypadKey::Clear),
            "ENT" => Some(KeypadKey::Enter),
            _ => {
                let mut chars = label.chars();
                let d = chars.next()?.to_digit(10)?;
                if chars.next().is_some() {
                    return None;
                }
                Some(KeypadKey::Digit(d as u8))
            }
        }
    }
}

impl fmt::Display for KeypadKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeypadKey::Digit(d) => write!(f, "{}", d),
            KeypadKey::Clear => f.write_str("CLR"),
            KeypadKey::Enter => f.write_str("ENT"),
        }
    }
}

/// Result of a single key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResponse {
    /// The keypad is already open; nothing happens.
    Ignored,
    /// A digit was appended, or dropped because the buffer is full.
    Typed,
    Cleared,
    /// The code matched. Reported exactly once.
    Accepted,
    /// Wrong code; the buffer was cleared.
    Rejected,
}

#[derive(Component, Debug, Clone)]
pub struct Keypad {
    code: ArrayString<KEYPAD_DIGITS>,
    input: ArrayString<KEYPAD_DIGITS>,
    flash: Option<&'static str>,
    unlocked: bool,
    /// Door unlocked on success.
    pub door: Option<Entity>,
}

impl Keypad {
    /// Codes longer than [`KEYPAD_DIGITS`] are truncated.
    pub fn new(code: &str) -> Self {
        let mut c = ArrayString::new();
        for ch in code.chars().filter(|c| c.is_ascii_digit()).take(KEYPAD_DIGITS) {
            c.push(ch);
        }
        Self {
            code: c,
            input: ArrayString::new(),
            flash: None,
            unlocked: false,
            door: None,
        }
    }

    pub fn with_door(mut self, door: Entity) -> Self {
        self.door = Some(door);
        self
    }

    pub fn press(&mut self, key: KeypadKey) -> KeyResponse {
        if self.unlocked {
            return KeyResponse::Ignored;
        }
        match key {
            KeypadKey::Clear => {
                self.input.clear();
                self.flash = None;
                KeyResponse::Cleared
            }
            KeypadKey::Enter => {
                if self.input == self.code {
                    self.unlocked = true;
                    self.flash = Some("OPEN");
                    KeyResponse::Accepted
                } else {
                    self.input.clear();
                    self.flash = Some("ERR");
                    KeyResponse::Rejected
                }
            }
            KeypadKey::Digit(d) => {
                self.flash = None;
                if self.input.is_full() {
                    // the button still clicks, the screen keeps the first four
                    debug!("Keypad buffer full, dropping digit {}", d);
                } else if let Some(ch) = char::from_digit(u32::from(d), 10) {
                    self.input.push(ch);
                }
                KeyResponse::Typed
            }
        }
    }

    /// Text on the small screen: a status word or the typed digits.
    pub fn display(&self) -> &str {
        self.flash.unwrap_or(self.input.as_str())
    }

    /// Drop the error flash so the screen shows the buffer again.
    pub fn reset_display(&mut self) {
        if !self.unlocked {
            self.flash = None;
        }
    }

    pub fn input(&self) -> &str {
        self.input.as_str()
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Put the keypad in its solved state without reporting a success.
    pub fn force_unlocked(&mut self, unlocked: bool) {
        self.unlocked = unlocked;
        self.input.clear();
        self.flash = if unlocked { Some("OPEN") } else { None };
    }
}
