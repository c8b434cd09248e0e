//! Keypad composition engine.
//!
//! `CompositionEngine` owns the session state and the frequency model and
//! maps keypad events onto them. The language-specific part (turning a
//! romanized buffer into raw candidate strings) sits behind the
//! `CandidateProvider` trait so the same engine drives any syllabic script.

use crate::candidate::Candidate;
use crate::clock::{Clock, MonotonicClock};
use crate::context::ImeContext;
use crate::error::PersistenceError;
use crate::frequency::{FlushSchedule, FrequencyModel};
use crate::keypad::{Key, KeyEvent, KeyResult};
use crate::multitap::{KeyDecoder, LETTER_CLUSTERS, SYMBOL_CLUSTERS};
use crate::ranking::rank;
use crate::session::{AlphabetMode, CompositionState};
use crate::store::{load_frequency, save_frequency, ByteStore};
use crate::Config;
use std::collections::HashSet;

/// Source of raw candidates for a romanized buffer.
pub trait CandidateProvider {
    /// Unranked candidates for `buffer`, in first-seen order.
    ///
    /// Must be deterministic for a given buffer and must not fail: an unknown
    /// buffer simply yields no candidates.
    fn candidates(&self, buffer: &str) -> Vec<String>;
}

impl<T: CandidateProvider + ?Sized> CandidateProvider for Box<T> {
    fn candidates(&self, buffer: &str) -> Vec<String> {
        (**self).candidates(buffer)
    }
}

/// Single-owner composition engine.
///
/// Type parameter P is the candidate provider (e.g. the pinyin dictionary
/// provider).
pub struct CompositionEngine<P> {
    provider: P,
    config: Config,
    state: CompositionState,
    letters: KeyDecoder,
    symbols: KeyDecoder,
    last_one_press: Option<u64>,
    frequency: FrequencyModel,
    schedule: FlushSchedule,
    store: Option<Box<dyn ByteStore>>,
    clock: Box<dyn Clock>,
    outbox: Vec<String>,
}

impl<P: CandidateProvider> CompositionEngine<P> {
    /// Create an engine whose learned frequencies live in memory only.
    pub fn new(provider: P, config: Config) -> Self {
        let window = config.repeat_window_ms;
        Self {
            provider,
            state: CompositionState::with_window_size(config.candidate_window),
            letters: KeyDecoder::new(LETTER_CLUSTERS, window),
            symbols: KeyDecoder::new(SYMBOL_CLUSTERS, window),
            last_one_press: None,
            frequency: FrequencyModel::with_capacity(config.max_freq_entries),
            schedule: FlushSchedule::new(config.flush_interval),
            store: None,
            clock: Box::new(MonotonicClock::new()),
            outbox: Vec::new(),
            config,
        }
    }

    /// Create an engine that loads and periodically flushes its frequency
    /// table through `store`.
    ///
    /// Storage failures never prevent startup: an unavailable store leaves the
    /// engine running with an in-memory model for the session.
    pub fn with_store(provider: P, config: Config, store: Box<dyn ByteStore>) -> Self {
        let mut engine = Self::new(provider, config);
        let key = engine.config.frequency_key.clone();
        match load_frequency(store.as_ref(), &key, engine.config.max_freq_entries) {
            Ok(model) => {
                engine.frequency = model;
                engine.store = Some(store);
            }
            Err(e) if e.is_unavailable() => {
                tracing::warn!(error = %e, "frequency storage unavailable, learning in memory only");
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read frequency record, starting fresh");
                engine.store = Some(store);
            }
        }
        engine
    }

    /// Replace the time source used by [`process_key`](Self::process_key).
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn state(&self) -> &CompositionState {
        &self.state
    }

    pub fn frequency(&self) -> &FrequencyModel {
        &self.frequency
    }

    pub fn mode(&self) -> AlphabetMode {
        self.state.mode()
    }

    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Commits counted since the last flush.
    pub fn pending_flush(&self) -> u32 {
        self.schedule.pending()
    }

    /// Switch alphabet directly, as the mode key would.
    pub fn set_mode(&mut self, mode: AlphabetMode) {
        self.state.set_mode(mode);
        self.reset_decoders();
        tracing::debug!(mode = mode.label(), "alphabet mode changed");
    }

    /// Process a key event using the engine clock.
    pub fn process_key(&mut self, event: KeyEvent) -> KeyResult {
        let now = self.clock.now_ms();
        self.process_key_at(event, now)
    }

    /// Process a key event observed at `now_ms`.
    pub fn process_key_at(&mut self, event: KeyEvent, now_ms: u64) -> KeyResult {
        if !matches!(event, KeyEvent::Press(Key::Digit(1))) {
            self.last_one_press = None;
        }
        match event {
            KeyEvent::Press(Key::Digit(d @ 2..=9)) => self.tap_key(d, now_ms),
            KeyEvent::Press(Key::Digit(0)) => {
                self.reset_decoders();
                self.zero_key()
            }
            KeyEvent::Press(Key::Digit(1)) => {
                self.reset_decoders();
                self.one_key(now_ms)
            }
            KeyEvent::Press(Key::Digit(_)) => KeyResult::NotHandled,
            KeyEvent::Press(Key::Star) => {
                self.reset_decoders();
                if self.state.candidates().is_empty() {
                    self.state.toggle_key_table_hint();
                } else {
                    self.state.candidates_mut().select_prev();
                }
                KeyResult::Handled
            }
            KeyEvent::Press(Key::Pound) => {
                self.reset_decoders();
                if self.state.candidates().is_empty() {
                    KeyResult::NotHandled
                } else {
                    self.state.candidates_mut().select_next();
                    KeyResult::Handled
                }
            }
            KeyEvent::CycleMode => {
                let next = self.state.mode().next();
                self.set_mode(next);
                KeyResult::Handled
            }
            KeyEvent::Backspace => {
                self.reset_decoders();
                self.backspace()
            }
            KeyEvent::Cancel => {
                self.reset_decoders();
                if self.state.is_composing() || !self.state.pending().is_empty() {
                    self.state.clear_composition();
                    KeyResult::Handled
                } else {
                    KeyResult::NotHandled
                }
            }
            KeyEvent::Send => {
                self.reset_decoders();
                self.send()
            }
        }
    }

    fn tap_key(&mut self, digit: u8, now_ms: u64) -> KeyResult {
        match self.state.mode() {
            AlphabetMode::Syllabic => {
                let Some(tap) = self.letters.press(digit, now_ms) else {
                    return KeyResult::NotHandled;
                };
                self.state.pending_mut().apply_tap(tap, false);
                self.state.set_composing(true);
                self.refresh_candidates();
            }
            AlphabetMode::Latin { uppercase } => {
                let Some(tap) = self.letters.press(digit, now_ms) else {
                    return KeyResult::NotHandled;
                };
                self.state.committed_mut().apply_tap(tap, uppercase);
            }
            AlphabetMode::Numeric { symbols: false } => {
                self.reset_decoders();
                self.state.committed_mut().push(char::from(b'0' + digit));
            }
            AlphabetMode::Numeric { symbols: true } => {
                let Some(tap) = self.symbols.press(digit, now_ms) else {
                    return KeyResult::NotHandled;
                };
                self.state.committed_mut().apply_tap(tap, false);
            }
        }
        KeyResult::Handled
    }

    fn zero_key(&mut self) -> KeyResult {
        match self.state.mode() {
            AlphabetMode::Syllabic => {
                if self.state.is_composing() && !self.state.candidates().is_empty() {
                    self.commit_selected();
                } else {
                    self.state.committed_mut().push('0');
                }
            }
            AlphabetMode::Numeric { symbols: false } => self.state.committed_mut().push('0'),
            AlphabetMode::Latin { .. } | AlphabetMode::Numeric { symbols: true } => {
                self.state.committed_mut().push(' ')
            }
        }
        KeyResult::Handled
    }

    fn one_key(&mut self, now_ms: u64) -> KeyResult {
        let double = self
            .last_one_press
            .is_some_and(|last| now_ms.saturating_sub(last) < self.config.repeat_window_ms);
        if double {
            self.state.toggle_key_table_hint();
        } else if self.state.mode() == (AlphabetMode::Numeric { symbols: false }) {
            self.state.committed_mut().push('1');
        } else {
            self.state.committed_mut().push(' ');
        }
        self.last_one_press = Some(now_ms);
        KeyResult::Handled
    }

    fn backspace(&mut self) -> KeyResult {
        if self.state.is_composing() && !self.state.pending().is_empty() {
            self.state.pending_mut().pop_unit();
            if self.state.pending().is_empty() {
                self.state.clear_composition();
            } else {
                self.refresh_candidates();
            }
            KeyResult::Handled
        } else if self.state.committed_mut().pop_unit().is_some() {
            KeyResult::Handled
        } else {
            KeyResult::NotHandled
        }
    }

    fn send(&mut self) -> KeyResult {
        if self.state.is_composing() && !self.state.candidates().is_empty() {
            self.commit_selected();
            return KeyResult::Handled;
        }
        if self.state.committed().is_empty() {
            return KeyResult::NotHandled;
        }
        let text = self.state.committed_mut().take();
        tracing::debug!(chars = text.chars().count(), "handing committed text to sink");
        self.outbox.push(text);
        KeyResult::Handled
    }

    fn reset_decoders(&mut self) {
        self.letters.reset();
        self.symbols.reset();
    }

    /// Ranked candidates for `buffer`, without touching session state.
    ///
    /// Empty buffers have no candidates. The provider's raw set is reduced to
    /// the first `max_candidates` unique strings, then ranked by usage.
    pub fn candidates_for(&self, buffer: &str) -> Vec<Candidate> {
        if buffer.is_empty() {
            return Vec::new();
        }
        let mut seen = HashSet::new();
        let raw: Vec<String> = self
            .provider
            .candidates(buffer)
            .into_iter()
            .filter(|c| seen.insert(c.clone()))
            .take(self.config.max_candidates)
            .collect();
        rank(raw, &self.frequency)
    }

    /// Recompute candidates for the pending buffer and reset the selection.
    pub fn refresh_candidates(&mut self) {
        let ranked = self.candidates_for(self.state.pending().text());
        tracing::debug!(
            buffer = self.state.pending().text(),
            count = ranked.len(),
            "candidates updated"
        );
        self.state.candidates_mut().set_candidates(ranked);
    }

    /// Commit the highlighted candidate. Returns the committed text.
    pub fn commit_selected(&mut self) -> Option<String> {
        let text = self.state.candidates().selected()?.text.clone();
        self.commit(&text);
        Some(text)
    }

    /// Commit `text`: append it to the message, learn it, leave composition.
    ///
    /// Every `flush_interval` commits the frequency table is written to the
    /// attached store; a failed write is logged and the in-memory model stays
    /// authoritative.
    pub fn commit(&mut self, text: &str) {
        self.state.committed_mut().push_str(text);
        let count = self.frequency.learn(text);
        tracing::debug!(text, count, "committed");
        self.state.clear_composition();
        self.reset_decoders();

        if self.schedule.tick() {
            if self.store.is_some() {
                if let Err(e) = self.flush() {
                    tracing::warn!(error = %e, "periodic frequency flush failed");
                }
            } else {
                tracing::debug!("no frequency store attached, skipping flush");
            }
        }
    }

    /// Write the frequency table to the attached store now.
    pub fn flush(&mut self) -> Result<(), PersistenceError> {
        let Some(store) = self.store.as_mut() else {
            return Err(PersistenceError::Unavailable(
                "no frequency store attached".to_string(),
            ));
        };
        save_frequency(store.as_mut(), &self.config.frequency_key, &self.frequency)?;
        self.schedule.reset();
        Ok(())
    }

    /// Texts handed to the commit sink by `Send`, oldest first.
    pub fn take_sent(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outbox)
    }

    /// Read-only snapshot for display.
    pub fn snapshot(&self) -> ImeContext {
        let candidates = self.state.candidates();
        ImeContext {
            mode_label: self.state.mode().label().to_string(),
            composing: self.state.is_composing(),
            pending_text: self.state.pending().text().to_string(),
            candidates: candidates.candidates().iter().map(|c| c.text.clone()).collect(),
            candidate_cursor: candidates.cursor(),
            window_start: candidates.window_start(),
            window_size: candidates.window_size(),
            committed_text: self.state.committed().text().to_string(),
            show_key_table: self.state.key_table_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::collections::HashMap;

    struct MapProvider(HashMap<&'static str, Vec<&'static str>>);

    impl CandidateProvider for MapProvider {
        fn candidates(&self, buffer: &str) -> Vec<String> {
            self.0
                .get(buffer)
                .map(|v| v.iter().map(|s| s.to_string()).collect())
                .unwrap_or_default()
        }
    }

    fn engine() -> CompositionEngine<MapProvider> {
        let mut map = HashMap::new();
        map.insert("ni", vec!["你", "尼", "你"]);
        CompositionEngine::new(MapProvider(map), Config::default())
    }

    fn press(e: &mut CompositionEngine<MapProvider>, keys: &[(char, u64)]) {
        for &(ch, at) in keys {
            if let Some(key) = Key::from_char(ch) {
                e.process_key_at(KeyEvent::Press(key), at);
            }
        }
    }

    #[test]
    fn candidates_are_deduped_and_ranked() {
        let e = engine();
        let texts: Vec<String> = e.candidates_for("ni").into_iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["你", "尼"]);
        assert!(e.candidates_for("").is_empty());
    }

    #[test]
    fn typing_composes_and_zero_commits() {
        let mut e = engine();
        // 66 -> n, 444 -> i
        press(&mut e, &[('6', 0), ('6', 10), ('4', 20), ('4', 30), ('4', 40)]);
        assert_eq!(e.state().pending().text(), "ni");
        assert!(e.state().is_composing());
        press(&mut e, &[('0', 50)]);
        assert_eq!(e.state().committed().text(), "你");
        assert_eq!(e.frequency().frequency("你"), 1);
        assert!(!e.state().is_composing());
    }

    #[test]
    fn flush_without_store_is_unavailable() {
        let mut e = engine();
        assert!(e.flush().unwrap_err().is_unavailable());
    }

    #[test]
    fn flush_writes_through_store() {
        let mut map = HashMap::new();
        map.insert("a", vec!["A"]);
        let mut e = CompositionEngine::with_store(
            MapProvider(map),
            Config::default(),
            Box::new(MemoryStore::new()),
        );
        assert!(e.has_store());
        e.commit("A");
        assert_eq!(e.pending_flush(), 1);
        e.flush().unwrap();
        assert_eq!(e.pending_flush(), 0);
    }
}
