//! Text buffers edited by the keypad.
//!
//! Both the pending romanized spelling and the committed message text live in
//! an `InputBuffer`. Editing only happens at the end of the buffer: letters
//! are appended or replaced by multi-tap cycling, and backspace removes one
//! display-level unit (a character together with any trailing combining
//! marks), so multi-byte characters are never split.

use crate::multitap::Tap;
use unicode_normalization::char::is_combining_mark;

/// Append-only text buffer with display-unit backspace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub fn push_str(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// Apply a multi-tap result, optionally upper-casing the letter.
    pub fn apply_tap(&mut self, tap: Tap, uppercase: bool) {
        let letter = if uppercase {
            tap.letter.to_ascii_uppercase()
        } else {
            tap.letter
        };
        Tap { letter, ..tap }.apply(&mut self.text);
    }

    /// Remove the last display unit.
    /// Returns the removed text, or `None` when the buffer was empty.
    pub fn pop_unit(&mut self) -> Option<String> {
        let mut cut = self.text.len();
        for (idx, ch) in self.text.char_indices().rev() {
            cut = idx;
            if !is_combining_mark(ch) {
                break;
            }
        }
        if cut == self.text.len() {
            return None;
        }
        Some(self.text.split_off(cut))
    }

    /// Take the whole text, leaving the buffer empty.
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pop_removes_whole_multibyte_char() {
        let mut buf = InputBuffer::new();
        buf.push_str("a你好");
        assert_eq!(buf.pop_unit().as_deref(), Some("好"));
        assert_eq!(buf.text(), "a你");
        assert_eq!(buf.pop_unit().as_deref(), Some("你"));
        assert_eq!(buf.pop_unit().as_deref(), Some("a"));
        assert_eq!(buf.pop_unit(), None);
    }

    #[test]
    fn pop_removes_trailing_combining_marks() {
        let mut buf = InputBuffer::new();
        buf.push_str("ni\u{0301}");
        assert_eq!(buf.pop_unit().as_deref(), Some("i\u{0301}"));
        assert_eq!(buf.text(), "n");
    }

    #[test]
    fn tap_replaces_when_cycling() {
        let mut buf = InputBuffer::new();
        buf.apply_tap(
            Tap {
                letter: 'a',
                replaces_previous: false,
            },
            false,
        );
        buf.apply_tap(
            Tap {
                letter: 'b',
                replaces_previous: true,
            },
            true,
        );
        assert_eq!(buf.text(), "B");
    }

    #[test]
    fn take_empties_buffer() {
        let mut buf = InputBuffer::new();
        buf.push_str("hi");
        assert_eq!(buf.take(), "hi");
        assert!(buf.is_empty());
    }
}
