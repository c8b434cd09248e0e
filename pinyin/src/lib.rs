//! tapime-pinyin crate root
//!
//! Pinyin support for the keypad composition engine: the tone normalizer,
//! the syllable dictionary, multi-syllable segmentation, multi-character
//! candidate generation and the `PinyinProvider` that plugs all of it into
//! `tapime_core::CompositionEngine`.

pub mod combine;
pub mod config;
pub mod dictionary;
pub mod provider;
pub mod resource;
pub mod script;
pub mod segment;
pub mod tone;

pub use combine::generate_multi_char_candidates;
pub use config::PinyinConfig;
pub use dictionary::Dictionary;
pub use provider::PinyinProvider;
pub use resource::{decode_records, DictRecord};
pub use script::{parse_script, replay, ScriptError};
pub use segment::segment;
pub use tone::normalize;

// Engine types callers need alongside the provider.
pub use tapime_core::{
    AlphabetMode, ByteStore, Candidate, CompositionEngine, Config, DirStore, ImeContext, Key,
    KeyEvent, KeyResult, LoadError, MemoryStore, PersistenceError, RedbStore,
};

use std::path::Path;
use std::sync::Arc;

/// Composition engine driven by the pinyin provider.
pub type PinyinEngine = CompositionEngine<PinyinProvider>;

/// Load a dictionary from `path`, choosing the format by extension.
///
/// `.bincode` and `.bin` files are compiled snapshots; anything else is
/// parsed as resource records.
pub fn load_dictionary<P: AsRef<Path>>(path: P) -> Result<Dictionary, LoadError> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some("bincode") | Some("bin") => Dictionary::load_bincode(path),
        _ => Dictionary::load(path),
    }
}

/// Dictionary named by `config`, or an empty one when it is missing or
/// unreadable. Composition still works without a dictionary; the syllabic
/// alphabet simply yields no candidates.
pub fn dictionary_or_empty(config: &PinyinConfig) -> Dictionary {
    let Some(path) = config.dictionary_path.as_ref() else {
        tracing::warn!("no dictionary configured, syllabic input has no candidates");
        return Dictionary::new();
    };
    match load_dictionary(path) {
        Ok(dict) => dict,
        Err(e) => {
            tracing::warn!(error = %e, "dictionary unavailable, continuing with an empty one");
            Dictionary::new()
        }
    }
}

/// Build a ready-to-use engine from `config`.
///
/// The dictionary comes from `config.dictionary_path` (empty on failure) and
/// learned frequencies from `store` when one is given.
pub fn build_engine(config: &PinyinConfig, store: Option<Box<dyn ByteStore>>) -> PinyinEngine {
    let dict = Arc::new(dictionary_or_empty(config));
    engine_with_dictionary(dict, config, store)
}

/// Build an engine over an already loaded dictionary.
pub fn engine_with_dictionary(
    dict: Arc<Dictionary>,
    config: &PinyinConfig,
    store: Option<Box<dyn ByteStore>>,
) -> PinyinEngine {
    let provider = PinyinProvider::new(dict, config);
    let base = config.base().clone();
    match store {
        Some(store) => CompositionEngine::with_store(provider, base, store),
        None => CompositionEngine::new(provider, base),
    }
}
