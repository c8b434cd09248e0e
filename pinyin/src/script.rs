//! Key scripts for driving the engine from text.
//!
//! A script is a string of keypad symbols (`0`-`9`, `*`, `#`) and control
//! characters:
//!
//! | char | event |
//! |------|-------|
//! | `m`  | cycle alphabet mode |
//! | `<`  | backspace |
//! | `x`  | cancel composition |
//! | `>`  | send |
//! | ` `  | pause longer than the repeat window |
//!
//! Consecutive presses are spaced [`PRESS_GAP_MS`] apart so repeated digits
//! cycle through their cluster; a space inserts [`PAUSE_MS`] so the next
//! press starts a new letter.

use std::fmt;
use tapime_core::{CandidateProvider, CompositionEngine, Key, KeyEvent, KeyResult};

pub const PRESS_GAP_MS: u64 = 10;
pub const PAUSE_MS: u64 = 1_000;

/// A script character that maps to no event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    pub position: usize,
    pub found: char,
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unexpected '{}' at position {} in key script",
            self.found, self.position
        )
    }
}

impl std::error::Error for ScriptError {}

/// Parse `script` into events stamped with synthetic times from `start_ms`.
pub fn parse_script(script: &str, start_ms: u64) -> Result<Vec<(KeyEvent, u64)>, ScriptError> {
    let mut now = start_ms;
    let mut events = Vec::new();
    for (position, ch) in script.chars().enumerate() {
        let event = match ch {
            ' ' => {
                now += PAUSE_MS;
                continue;
            }
            'm' => KeyEvent::CycleMode,
            '<' => KeyEvent::Backspace,
            'x' => KeyEvent::Cancel,
            '>' => KeyEvent::Send,
            other => match Key::from_char(other) {
                Some(key) => KeyEvent::Press(key),
                None => {
                    return Err(ScriptError {
                        position,
                        found: other,
                    })
                }
            },
        };
        events.push((event, now));
        now += PRESS_GAP_MS;
    }
    Ok(events)
}

/// Replay `script` against `engine`. Returns the time after the last event
/// and how many events the engine handled.
pub fn replay<P: CandidateProvider>(
    engine: &mut CompositionEngine<P>,
    script: &str,
    start_ms: u64,
) -> Result<(u64, usize), ScriptError> {
    let events = parse_script(script, start_ms)?;
    let mut handled = 0;
    let mut end = start_ms;
    for (event, at) in events {
        if engine.process_key_at(event, at) == KeyResult::Handled {
            handled += 1;
        }
        end = at + PRESS_GAP_MS;
    }
    Ok((end, handled))
}
