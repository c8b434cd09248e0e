//! Pinyin-specific configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All generic options from `tapime_core::Config` (flattened via serde)
//! - Segmentation and combination limits
//! - The location of the dictionary resource
//!
//! # Example
//!
//! ```rust
//! use tapime_pinyin::PinyinConfig;
//!
//! let config = PinyinConfig::default();
//! assert_eq!(config.min_segmentation_len, 4);
//! let base = config.into_base();
//! assert_eq!(base.max_candidates, 20);
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::combine::PER_SEGMENTATION_CAP;
use crate::segment::MIN_SEGMENTATION_LEN;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PinyinConfig {
    /// Base configuration fields (timing, caps, frequency model, cache)
    #[serde(flatten)]
    pub base: tapime_core::Config,

    /// Shortest buffer (in characters) that falls back to segmentation
    pub min_segmentation_len: usize,

    /// Maximum strings expanded from one segmentation
    pub per_segmentation_cap: usize,

    /// Dictionary resource: JSON records or a compiled bincode snapshot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary_path: Option<PathBuf>,
}

impl Default for PinyinConfig {
    fn default() -> Self {
        Self {
            base: tapime_core::Config::default(),
            min_segmentation_len: MIN_SEGMENTATION_LEN,
            per_segmentation_cap: PER_SEGMENTATION_CAP,
            dictionary_path: None,
        }
    }
}

impl PinyinConfig {
    /// Convert this pinyin config into the base config for the core engine
    pub fn into_base(self) -> tapime_core::Config {
        self.base
    }

    /// Get a reference to the base config
    pub fn base(&self) -> &tapime_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut tapime_core::Config {
        &mut self.base
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, toml::to_string_pretty(self)?)?;
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
