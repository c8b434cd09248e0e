//! tapime-core
//!
//! Language-agnostic core of the keypad composition engine: multi-tap key
//! decoding, the adaptive frequency model and its persistence, candidate
//! ranking and the session state machine shared by language crates
//! (tapime-pinyin).
//!
//! Public API:
//! - `CompositionEngine` - Key event processing over a `CandidateProvider`
//! - `KeyDecoder` - Multi-tap cycling state machine
//! - `FrequencyModel` - Bounded usage counters with least-used eviction
//! - `ByteStore` - Key-value persistence (`MemoryStore`, `DirStore`, `RedbStore`)
//! - `ImeContext` - Display snapshot read by the host
//! - `Config` - Configuration and tunables
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{LoadError, PersistenceError};

pub mod keypad;
pub use keypad::{Key, KeyEvent, KeyResult};

pub mod multitap;
pub use multitap::{ClusterTable, KeyDecoder, Tap, LETTER_CLUSTERS, SYMBOL_CLUSTERS};

pub mod frequency;
pub use frequency::{FlushSchedule, FrequencyModel};

pub mod store;
pub use store::{load_frequency, save_frequency, ByteStore, DirStore, MemoryStore, RedbStore};

pub mod ranking;
pub use ranking::rank;

pub mod clock;
pub use clock::{Clock, MonotonicClock};

pub mod candidate;
pub use candidate::{Candidate, CandidateList};

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod session;
pub use session::{AlphabetMode, CompositionState};

pub mod context;
pub use context::ImeContext;

pub mod engine;
pub use engine::{CandidateProvider, CompositionEngine};

/// Generic configuration for the composition engine.
///
/// This config contains only language-agnostic fields. Language-specific
/// options (segmentation limits, dictionary location) belong in
/// `PinyinConfig` in the language crate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Repeat window for multi-tap cycling and the double-`1` gesture (ms)
    pub repeat_window_ms: u64,

    /// Maximum unique candidates kept for one buffer
    pub max_candidates: usize,

    /// Candidates visible at once
    pub candidate_window: usize,

    // Frequency Model
    /// Maximum number of learned strings
    pub max_freq_entries: usize,
    /// Commits between amortized flushes
    pub flush_interval: u32,
    /// Store key holding the frequency record
    pub frequency_key: String,

    // Cache Management
    /// Maximum number of entries in the buffer -> raw candidates cache
    pub max_cache_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repeat_window_ms: multitap::REPEAT_WINDOW_MS,
            max_candidates: 20,
            candidate_window: candidate::CANDIDATE_WINDOW,
            max_freq_entries: frequency::MAX_FREQ_ENTRIES,
            flush_interval: frequency::FLUSH_INTERVAL,
            frequency_key: "frequency.txt".to_string(),
            max_cache_size: 256,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_device_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.repeat_window_ms, 800);
        assert_eq!(cfg.max_candidates, 20);
        assert_eq!(cfg.candidate_window, 5);
        assert_eq!(cfg.max_freq_entries, 500);
        assert_eq!(cfg.flush_interval, 100);
        assert_eq!(cfg.frequency_key, "frequency.txt");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let cfg = Config::from_toml_str("repeat_window_ms = 600\n").unwrap();
        assert_eq!(cfg.repeat_window_ms, 600);
        assert_eq!(cfg.max_freq_entries, 500);
    }

    #[test]
    fn toml_roundtrip() {
        let cfg = Config {
            flush_interval: 7,
            ..Config::default()
        };
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tapime.toml");
        let cfg = Config::default();
        cfg.save_toml(&path).unwrap();
        assert_eq!(Config::load_toml(&path).unwrap(), cfg);
    }
}
