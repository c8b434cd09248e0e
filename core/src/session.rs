//! Composition session state.
//!
//! `CompositionState` groups everything that changes while the user types:
//! the active alphabet, the pending romanized spelling, the committed message
//! text and the ranked candidates for the pending spelling. The engine owns
//! exactly one of these.

use crate::candidate::CandidateList;
use crate::input_buffer::InputBuffer;

/// Active alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphabetMode {
    /// Romanized syllables converted to characters through candidates
    Syllabic,
    /// Latin letters typed straight into the committed text
    Latin { uppercase: bool },
    /// Digits, or punctuation when `symbols` is set
    Numeric { symbols: bool },
}

impl AlphabetMode {
    /// The mode reached by pressing the mode key once.
    ///
    /// Syllabic → Latin → Latin upper → Numeric → Symbols → Syllabic.
    pub fn next(self) -> Self {
        match self {
            AlphabetMode::Syllabic => AlphabetMode::Latin { uppercase: false },
            AlphabetMode::Latin { uppercase: false } => AlphabetMode::Latin { uppercase: true },
            AlphabetMode::Latin { uppercase: true } => AlphabetMode::Numeric { symbols: false },
            AlphabetMode::Numeric { symbols: false } => AlphabetMode::Numeric { symbols: true },
            AlphabetMode::Numeric { symbols: true } => AlphabetMode::Syllabic,
        }
    }

    /// Short status-bar label.
    pub fn label(self) -> &'static str {
        match self {
            AlphabetMode::Syllabic => "CHS",
            AlphabetMode::Latin { uppercase: false } => "ENG",
            AlphabetMode::Latin { uppercase: true } => "ENG(C)",
            AlphabetMode::Numeric { symbols: false } => "NUM",
            AlphabetMode::Numeric { symbols: true } => "SYM",
        }
    }
}

impl Default for AlphabetMode {
    fn default() -> Self {
        Self::Syllabic
    }
}

/// Session state for one composition engine.
#[derive(Debug, Clone)]
pub struct CompositionState {
    mode: AlphabetMode,

    /// Romanized spelling being composed (e.g. "nihao")
    pending: InputBuffer,

    /// Text already committed and waiting to be sent
    committed: InputBuffer,

    /// Ranked candidates for `pending`
    candidates: CandidateList,

    composing: bool,

    /// Whether the key-table hint overlay is shown
    key_table_hint: bool,
}

impl CompositionState {
    pub fn new() -> Self {
        Self::with_window_size(crate::candidate::CANDIDATE_WINDOW)
    }

    /// Create a state whose candidate list shows `window_size` entries.
    pub fn with_window_size(window_size: usize) -> Self {
        Self {
            mode: AlphabetMode::Syllabic,
            pending: InputBuffer::new(),
            committed: InputBuffer::new(),
            candidates: CandidateList::with_window_size(window_size),
            composing: false,
            key_table_hint: false,
        }
    }

    pub fn mode(&self) -> AlphabetMode {
        self.mode
    }

    /// Switch alphabet. Drops the composition but never committed text.
    pub fn set_mode(&mut self, mode: AlphabetMode) {
        self.mode = mode;
        self.clear_composition();
    }

    pub fn pending(&self) -> &InputBuffer {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut InputBuffer {
        &mut self.pending
    }

    pub fn committed(&self) -> &InputBuffer {
        &self.committed
    }

    pub fn committed_mut(&mut self) -> &mut InputBuffer {
        &mut self.committed
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn candidates_mut(&mut self) -> &mut CandidateList {
        &mut self.candidates
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    pub fn set_composing(&mut self, composing: bool) {
        self.composing = composing;
    }

    pub fn key_table_hint(&self) -> bool {
        self.key_table_hint
    }

    pub fn toggle_key_table_hint(&mut self) {
        self.key_table_hint = !self.key_table_hint;
    }

    /// Drop pending spelling and candidates and leave composition.
    pub fn clear_composition(&mut self) {
        self.pending.clear();
        self.candidates.clear();
        self.composing = false;
    }
}

impl Default for CompositionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_cycle_visits_all_five_states() {
        let mut mode = AlphabetMode::default();
        let mut labels = Vec::new();
        for _ in 0..5 {
            labels.push(mode.label());
            mode = mode.next();
        }
        assert_eq!(labels, vec!["CHS", "ENG", "ENG(C)", "NUM", "SYM"]);
        assert_eq!(mode, AlphabetMode::Syllabic);
    }

    #[test]
    fn mode_switch_keeps_committed_text() {
        let mut state = CompositionState::new();
        state.committed_mut().push_str("你好");
        state.pending_mut().push_str("ma");
        state.set_composing(true);
        state.set_mode(AlphabetMode::Latin { uppercase: false });
        assert!(state.pending().is_empty());
        assert!(!state.is_composing());
        assert_eq!(state.committed().text(), "你好");
    }
}
