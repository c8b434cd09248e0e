//! Multi-tap key decoding.
//!
//! Repeated presses of the same digit inside the repeat window step through
//! that digit's letter cluster, replacing the letter typed by the previous
//! press. A different digit, or the same digit after the window expired,
//! starts a new letter. The algorithm is identical for every alphabet; only
//! the cluster table differs.

/// Per-digit letter clusters, indexed by digit `0..=9`.
pub type ClusterTable = [&'static str; 10];

/// Letter clusters for Latin text and for romanized syllable spelling.
pub const LETTER_CLUSTERS: ClusterTable = [
    "", "", "abc", "def", "ghi", "jkl", "mno", "pqrs", "tuv", "wxyz",
];

/// Symbol clusters used by the numeric alphabet in symbol mode.
pub const SYMBOL_CLUSTERS: ClusterTable = [
    " ", "~", "!@#", "#$%", "^&*", "()_+", "-=[]", "{};:'", "<>,.?", "+/\\|",
];

/// Default repeat window in milliseconds.
pub const REPEAT_WINDOW_MS: u64 = 800;

/// Outcome of a single accepted press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tap {
    /// The letter selected by this press.
    pub letter: char,
    /// True when the press cycled, i.e. `letter` replaces the previous one.
    pub replaces_previous: bool,
}

impl Tap {
    /// Apply this tap to a buffer: remove-then-append on cycle, append otherwise.
    pub fn apply(self, buffer: &mut String) {
        if self.replaces_previous {
            buffer.pop();
        }
        buffer.push(self.letter);
    }
}

/// Stateful multi-tap decoder for one alphabet.
#[derive(Debug, Clone)]
pub struct KeyDecoder {
    clusters: ClusterTable,
    repeat_window_ms: u64,
    last_key: Option<u8>,
    last_press_ms: u64,
    cycle_index: usize,
}

impl KeyDecoder {
    pub fn new(clusters: ClusterTable, repeat_window_ms: u64) -> Self {
        Self {
            clusters,
            repeat_window_ms,
            last_key: None,
            last_press_ms: 0,
            cycle_index: 0,
        }
    }

    /// Decoder over [`LETTER_CLUSTERS`] with the default window.
    pub fn letters() -> Self {
        Self::new(LETTER_CLUSTERS, REPEAT_WINDOW_MS)
    }

    /// The cluster mapped to `digit`, empty for unmapped digits.
    pub fn cluster(&self, digit: u8) -> &'static str {
        self.clusters.get(digit as usize).copied().unwrap_or("")
    }

    /// True while the decoder is in the middle of a tap sequence.
    pub fn is_accumulating(&self) -> bool {
        self.last_key.is_some()
    }

    /// Feed a digit press observed at `now_ms`.
    ///
    /// Returns `None` (and leaves state untouched) for digits with an empty
    /// cluster.
    pub fn press(&mut self, digit: u8, now_ms: u64) -> Option<Tap> {
        let cluster = self.cluster(digit);
        let len = cluster.chars().count();
        if len == 0 {
            return None;
        }

        let repeat = self.last_key == Some(digit)
            && now_ms.saturating_sub(self.last_press_ms) < self.repeat_window_ms;
        if repeat {
            self.cycle_index = (self.cycle_index + 1) % len;
        } else {
            self.cycle_index = 0;
        }
        self.last_key = Some(digit);
        self.last_press_ms = now_ms;

        let letter = cluster.chars().nth(self.cycle_index)?;
        Some(Tap {
            letter,
            replaces_previous: repeat,
        })
    }

    /// Forget the current tap sequence; the next press starts a new letter.
    pub fn reset(&mut self) {
        self.last_key = None;
        self.last_press_ms = 0;
        self.cycle_index = 0;
    }
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::letters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_presses(decoder: &mut KeyDecoder, presses: &[(u8, u64)]) -> String {
        let mut buf = String::new();
        for &(digit, at) in presses {
            if let Some(tap) = decoder.press(digit, at) {
                tap.apply(&mut buf);
            }
        }
        buf
    }

    #[test]
    fn three_presses_cycle_to_c() {
        let mut d = KeyDecoder::letters();
        assert_eq!(type_presses(&mut d, &[(2, 0), (2, 100), (2, 200)]), "c");
    }

    #[test]
    fn fourth_press_wraps_to_a() {
        let mut d = KeyDecoder::letters();
        assert_eq!(
            type_presses(&mut d, &[(2, 0), (2, 100), (2, 200), (2, 300)]),
            "a"
        );
    }

    #[test]
    fn expired_window_appends_new_letter() {
        let mut d = KeyDecoder::letters();
        assert_eq!(type_presses(&mut d, &[(2, 0), (2, 801)]), "aa");
    }

    #[test]
    fn window_is_exclusive() {
        let mut d = KeyDecoder::letters();
        assert_eq!(type_presses(&mut d, &[(2, 0), (2, 799)]), "b");
        let mut d = KeyDecoder::letters();
        assert_eq!(type_presses(&mut d, &[(2, 0), (2, 800)]), "aa");
    }

    #[test]
    fn different_key_starts_new_letter() {
        let mut d = KeyDecoder::letters();
        // 6 6 -> n, 4 4 4 -> i
        let typed = type_presses(&mut d, &[(6, 0), (6, 50), (4, 100), (4, 150), (4, 200)]);
        assert_eq!(typed, "ni");
    }

    #[test]
    fn four_letter_cluster() {
        let mut d = KeyDecoder::letters();
        assert_eq!(
            type_presses(&mut d, &[(7, 0), (7, 10), (7, 20), (7, 30)]),
            "s"
        );
    }

    #[test]
    fn empty_cluster_is_noop() {
        let mut d = KeyDecoder::letters();
        assert_eq!(d.press(1, 0), None);
        assert_eq!(d.press(0, 10), None);
        assert!(!d.is_accumulating());
    }

    #[test]
    fn reset_breaks_sequence() {
        let mut d = KeyDecoder::letters();
        let mut buf = String::new();
        d.press(2, 0).unwrap().apply(&mut buf);
        d.reset();
        d.press(2, 10).unwrap().apply(&mut buf);
        assert_eq!(buf, "aa");
    }

    #[test]
    fn symbol_table_cycles() {
        let mut d = KeyDecoder::new(SYMBOL_CLUSTERS, REPEAT_WINDOW_MS);
        assert_eq!(type_presses(&mut d, &[(2, 0), (2, 10)]), "@");
        assert_eq!(d.cluster(0), " ");
    }
}
