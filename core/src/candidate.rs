//! Candidate types for keypad composition.
//!
//! This module provides:
//! - `Candidate`: a committable string with its learned usage count
//! - `CandidateList`: ranked list with a selection cursor and a scrolling
//!   visible window

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Default number of candidates visible at once.
pub const CANDIDATE_WINDOW: usize = 5;

/// A single text candidate with the usage count it was ranked by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    pub frequency: u32,
}

impl Candidate {
    pub fn new<T: Into<String>>(text: T, frequency: u32) -> Self {
        Candidate {
            text: text.into(),
            frequency,
        }
    }
}

/// A ranked candidate list with cursor navigation.
///
/// The cursor is a global index. The visible window holds `window_size`
/// candidates and scrolls just enough to keep the cursor inside it.
#[derive(Debug, Clone)]
pub struct CandidateList {
    /// All available candidates, best first
    candidates: Vec<Candidate>,

    /// Number of candidates shown at once
    window_size: usize,

    /// Index of the first visible candidate
    window_start: usize,

    /// Global index of the selected candidate
    cursor: usize,
}

impl CandidateList {
    /// Create a new empty candidate list.
    pub fn new() -> Self {
        Self::with_window_size(CANDIDATE_WINDOW)
    }

    /// Create a candidate list with the given visible window size.
    pub fn with_window_size(window_size: usize) -> Self {
        Self {
            candidates: Vec::new(),
            window_size: window_size.max(1),
            window_start: 0,
            cursor: 0,
        }
    }

    /// Create a candidate list from already ranked candidates.
    pub fn from_candidates(candidates: Vec<Candidate>) -> Self {
        let mut list = Self::new();
        list.set_candidates(candidates);
        list
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Replace the candidates, resetting cursor and window.
    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.reset();
    }

    /// Get all candidates.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Global index of the selected candidate (0 when empty).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Index of the first visible candidate.
    pub fn window_start(&self) -> usize {
        self.window_start
    }

    fn window_range(&self) -> Range<usize> {
        let start = self.window_start.min(self.candidates.len());
        let end = (start + self.window_size).min(self.candidates.len());
        start..end
    }

    /// Candidates inside the visible window.
    pub fn visible(&self) -> &[Candidate] {
        &self.candidates[self.window_range()]
    }

    /// The selected candidate, if any.
    pub fn selected(&self) -> Option<&Candidate> {
        self.candidates.get(self.cursor)
    }

    /// Move the cursor to the next candidate.
    /// Returns true if the cursor moved.
    pub fn select_next(&mut self) -> bool {
        if self.cursor + 1 < self.candidates.len() {
            self.cursor += 1;
            self.normalize_window();
            true
        } else {
            false
        }
    }

    /// Move the cursor to the previous candidate.
    /// Returns true if the cursor moved.
    pub fn select_prev(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.normalize_window();
            true
        } else {
            false
        }
    }

    /// Scroll the window so it contains the cursor.
    fn normalize_window(&mut self) {
        if self.cursor < self.window_start {
            self.window_start = self.cursor;
        }
        if self.cursor >= self.window_start + self.window_size {
            self.window_start = self.cursor + 1 - self.window_size;
        }
    }

    /// Clear the candidate list.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.reset();
    }

    /// Go back to the first candidate.
    pub fn reset(&mut self) {
        self.window_start = 0;
        self.cursor = 0;
    }
}

impl Default for CandidateList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(n: usize) -> CandidateList {
        CandidateList::from_candidates(
            (0..n).map(|i| Candidate::new(format!("c{}", i), 0)).collect(),
        )
    }

    #[test]
    fn empty_list_has_no_selection() {
        let mut list = CandidateList::new();
        assert!(list.selected().is_none());
        assert!(!list.select_next());
        assert!(!list.select_prev());
        assert_eq!(list.cursor(), 0);
        assert!(list.visible().is_empty());
    }

    #[test]
    fn window_scrolls_with_cursor() {
        let mut list = list_of(8);
        assert_eq!(list.visible().len(), 5);
        for _ in 0..5 {
            list.select_next();
        }
        assert_eq!(list.cursor(), 5);
        assert_eq!(list.window_start(), 1);
        assert_eq!(list.visible()[4].text, "c5");

        for _ in 0..5 {
            list.select_prev();
        }
        assert_eq!(list.cursor(), 0);
        assert_eq!(list.window_start(), 0);
    }

    #[test]
    fn cursor_stops_at_ends() {
        let mut list = list_of(2);
        assert!(list.select_next());
        assert!(!list.select_next());
        assert_eq!(list.selected().map(|c| c.text.as_str()), Some("c1"));
    }

    #[test]
    fn set_candidates_resets_cursor() {
        let mut list = list_of(7);
        list.select_next();
        list.select_next();
        list.set_candidates(vec![Candidate::new("x", 3)]);
        assert_eq!(list.cursor(), 0);
        assert_eq!(list.window_start(), 0);
        assert_eq!(list.selected().map(|c| c.frequency), Some(3));
    }
}
