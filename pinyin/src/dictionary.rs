//! Syllable → character dictionary.
//!
//! Built once at startup from the resource records and immutable afterwards.
//! Keys are canonical syllables (see [`crate::tone::normalize`]); values keep
//! resource order, including duplicates, which are collapsed only when
//! candidates are produced.

use crate::resource::{decode_records, DictRecord};
use crate::tone::normalize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::ops::Bound;
use std::path::Path;
use tapime_core::{LoadError, PersistenceError};

/// Ordered map from canonical syllable to candidate characters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    entries: BTreeMap<String, Vec<String>>,
    mappings: usize,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded records, one mapping per reading.
    pub fn from_records<I: IntoIterator<Item = DictRecord>>(records: I) -> Self {
        let mut dict = Self::new();
        let mut processed = 0usize;
        for record in records {
            for reading in &record.pinyin {
                dict.insert(reading, &record.character);
            }
            processed += 1;
            if processed % 5_000 == 0 {
                tracing::debug!(processed, mappings = dict.mappings, "loading dictionary");
            }
        }
        dict
    }

    /// Build from resource text (array or line stream of records).
    pub fn from_json_str(text: &str) -> Self {
        Self::from_records(decode_records(text))
    }

    /// Build from any reader yielding resource text.
    ///
    /// Bytes that are not valid UTF-8 are replaced before decoding, so a
    /// damaged resource still loads its readable records.
    pub fn from_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::from_json_str(&String::from_utf8_lossy(&bytes)))
    }

    /// Load the dictionary resource at `path`.
    ///
    /// Fails only when the resource cannot be opened or read; a malformed
    /// resource yields an empty (or partial) dictionary.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let unavailable = |source| LoadError::ResourceUnavailable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unavailable)?;
        let dict = Self::from_reader(BufReader::new(file)).map_err(unavailable)?;
        tracing::info!(
            path = %path.display(),
            syllables = dict.len(),
            mappings = dict.mapping_count(),
            "loaded pinyin dictionary"
        );
        Ok(dict)
    }

    /// Add one reading of `character`. Readings that normalize to nothing
    /// are ignored.
    pub fn insert(&mut self, reading: &str, character: &str) {
        let key = normalize(reading.trim());
        if key.is_empty() || character.is_empty() {
            return;
        }
        self.entries
            .entry(key)
            .or_default()
            .push(character.to_string());
        self.mappings += 1;
    }

    /// Characters for an exact canonical syllable.
    pub fn lookup(&self, syllable: &str) -> Option<&[String]> {
        self.entries.get(syllable).map(Vec::as_slice)
    }

    pub fn contains(&self, syllable: &str) -> bool {
        self.entries.contains_key(syllable)
    }

    /// All entries whose key starts with `prefix`, in key order.
    pub fn prefix_scan<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a [String])> + 'a {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct syllables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of syllable → character mappings.
    pub fn mapping_count(&self) -> usize {
        self.mappings
    }

    /// Iterate over all `(syllable, characters)` entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Save the built dictionary as a bincode snapshot.
    pub fn save_bincode<P: AsRef<Path>>(&self, path: P) -> Result<(), PersistenceError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)
            .map_err(|e| PersistenceError::Backend(e.to_string()))?;
        Ok(())
    }

    /// Load a bincode snapshot written by [`save_bincode`](Self::save_bincode).
    pub fn load_bincode<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::ResourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        let reader = BufReader::new(file);
        let dict: Self =
            bincode::deserialize_from(reader).map_err(|e| LoadError::Snapshot(e.to_string()))?;
        tracing::info!(path = %path.display(), syllables = dict.len(), "loaded dictionary snapshot");
        Ok(dict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dictionary {
        Dictionary::from_json_str(
            r#"[
                {"char": "你", "pinyin": ["nǐ"]},
                {"char": "尼", "pinyin": ["ní"]},
                {"char": "你", "pinyin": ["nǐ"]},
                {"char": "娘", "pinyin": ["niáng"]},
                {"char": "好", "pinyin": ["hǎo", "hào"]},
                {"char": "?", "pinyin": ["\u0300"]}
            ]"#,
        )
    }

    #[test]
    fn normalizes_keys_and_keeps_order_and_duplicates() {
        let dict = sample();
        assert_eq!(
            dict.lookup("ni").unwrap(),
            &["你".to_string(), "尼".to_string(), "你".to_string()]
        );
        assert_eq!(dict.lookup("hao").unwrap().len(), 2);
        assert!(dict.lookup("nǐ").is_none());
    }

    #[test]
    fn counts() {
        let dict = sample();
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.mapping_count(), 6);
    }

    #[test]
    fn iter_visits_every_mapping_in_key_order() {
        let dict = sample();
        let keys: Vec<&str> = dict.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["hao", "ni", "niang"]);
        let total: usize = dict.iter().map(|(_, chars)| chars.len()).sum();
        assert_eq!(total, dict.mapping_count());
    }

    #[test]
    fn empty_reading_is_skipped() {
        let dict = sample();
        assert!(!dict.contains(""));
    }

    #[test]
    fn prefix_scan_is_ordered_and_bounded() {
        let dict = sample();
        let keys: Vec<&str> = dict.prefix_scan("ni").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["ni", "niang"]);
        let keys: Vec<&str> = dict.prefix_scan("nia").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["niang"]);
        assert_eq!(dict.prefix_scan("z").count(), 0);
    }

    #[test]
    fn missing_resource_is_unavailable() {
        let err = Dictionary::load("/definitely/not/here/pinyin.json").unwrap_err();
        assert!(matches!(err, LoadError::ResourceUnavailable { .. }));
    }

    #[test]
    fn malformed_resource_is_empty() {
        let dict = Dictionary::from_reader("{not json".as_bytes()).unwrap();
        assert!(dict.is_empty());
    }

    #[test]
    fn bincode_snapshot_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.bincode");
        let dict = sample();
        dict.save_bincode(&path).unwrap();
        assert_eq!(Dictionary::load_bincode(&path).unwrap(), dict);
    }

    #[test]
    fn corrupt_snapshot_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dict.bincode");
        std::fs::write(&path, [0xffu8; 3]).unwrap();
        assert!(matches!(
            Dictionary::load_bincode(&path),
            Err(LoadError::Snapshot(_))
        ));
    }
}
