//! Display snapshot for the host.
//!
//! The `ImeContext` struct is a plain data container with public fields. After
//! feeding a key to the engine, the host reads these fields to redraw the
//! screen. Nothing here points back into the engine.

use serde::Serialize;

/// Read-only view of the composition state.
///
/// # Fields
///
/// - `mode_label`: status-bar label of the active alphabet
/// - `pending_text`: romanized spelling being composed
/// - `candidates`: every ranked candidate for `pending_text`
/// - `candidate_cursor`: global index of the highlighted candidate
/// - `window_start`: index of the first candidate on screen
/// - `window_size`: how many candidates fit on screen
/// - `committed_text`: message text waiting to be sent
/// - `show_key_table`: whether the key-table hint overlay is visible
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImeContext {
    pub mode_label: String,
    pub composing: bool,
    pub pending_text: String,
    pub candidates: Vec<String>,
    pub candidate_cursor: usize,
    pub window_start: usize,
    pub window_size: usize,
    pub committed_text: String,
    pub show_key_table: bool,
}

impl ImeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidates currently on screen.
    pub fn visible_candidates(&self) -> &[String] {
        let start = self.window_start.min(self.candidates.len());
        let end = (start + self.window_size).min(self.candidates.len());
        &self.candidates[start..end]
    }

    /// The highlighted candidate, if any.
    pub fn selected_candidate(&self) -> Option<&str> {
        self.candidates.get(self.candidate_cursor).map(String::as_str)
    }

    /// Check if there's any composition to show (pending text or candidates).
    pub fn has_visible_state(&self) -> bool {
        !self.pending_text.is_empty() || !self.candidates.is_empty()
    }
}
