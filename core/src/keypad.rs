//! Keypad symbols and host events.
//!
//! The key-scanning collaborator delivers one of twelve keypad symbols per
//! press: the digits `0`-`9` plus `*` and `#`. The host additionally drives a
//! handful of control events (mode cycling, backspace, cancel, send) that on
//! the device live on dedicated side keys.

/// A single keypad symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Digit key `0`..=`9`.
    Digit(u8),
    /// `*` key (previous candidate / key-table hint).
    Star,
    /// `#` key (next candidate).
    Pound,
}

impl Key {
    /// Parse a keypad symbol from its printed character.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '0'..='9' => Some(Key::Digit(ch as u8 - b'0')),
            '*' => Some(Key::Star),
            '#' => Some(Key::Pound),
            _ => None,
        }
    }

    /// The printed character for this key.
    pub fn as_char(self) -> char {
        match self {
            Key::Digit(d) => char::from(b'0' + d.min(9)),
            Key::Star => '*',
            Key::Pound => '#',
        }
    }
}

/// An input event accepted by the composition engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    /// One of the twelve keypad symbols.
    Press(Key),
    /// Step to the next alphabet mode.
    CycleMode,
    /// Delete the last pending letter, or the last committed character.
    Backspace,
    /// Drop the current composition without committing.
    Cancel,
    /// Hand the committed text to the transmission sink.
    Send,
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        KeyEvent::Press(key)
    }
}

/// Whether the engine consumed a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    Handled,
    NotHandled,
}
