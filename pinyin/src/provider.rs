//! Pinyin candidate provider.
//!
//! Implements the lookup cascade for a romanized buffer:
//! 1. exact syllable match → that syllable's characters
//! 2. otherwise prefix match → characters of every syllable starting with it
//! 3. otherwise, for long enough buffers, segmentation + combination
//!
//! Raw sets are memoized per buffer in an LRU cache. The dictionary never
//! changes, so cached sets never go stale; ranking by usage happens later in
//! the core engine and always sees current frequencies.

use std::cell::RefCell;
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use tapime_core::CandidateProvider;

use crate::combine::{generate_multi_char_candidates, TOTAL_CAP};
use crate::config::PinyinConfig;
use crate::dictionary::Dictionary;
use crate::segment::segment;

/// Dictionary-backed provider for the syllabic alphabet.
pub struct PinyinProvider {
    dict: Arc<Dictionary>,
    min_segmentation_len: usize,
    per_segmentation_cap: usize,
    max_candidates: usize,
    cache: RefCell<LruCache<String, Vec<String>>>,
    cache_hits: RefCell<usize>,
    cache_misses: RefCell<usize>,
}

impl PinyinProvider {
    /// Create a provider over `dict` using the limits in `config`.
    pub fn new(dict: Arc<Dictionary>, config: &PinyinConfig) -> Self {
        let capacity = NonZeroUsize::new(config.base.max_cache_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            dict,
            min_segmentation_len: config.min_segmentation_len,
            per_segmentation_cap: config.per_segmentation_cap,
            max_candidates: config.base.max_candidates,
            cache: RefCell::new(LruCache::new(capacity)),
            cache_hits: RefCell::new(0),
            cache_misses: RefCell::new(0),
        }
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Raw candidates for `buffer` (same as [`CandidateProvider::candidates`]).
    pub fn lookup(&self, buffer: &str) -> Vec<String> {
        if let Some(cached) = self.cache.borrow_mut().get(buffer) {
            *self.cache_hits.borrow_mut() += 1;
            return cached.clone();
        }
        *self.cache_misses.borrow_mut() += 1;

        let result = self.compute(buffer);
        self.cache
            .borrow_mut()
            .put(buffer.to_string(), result.clone());
        result
    }

    /// Segmentations the fallback search would use for `buffer`.
    pub fn segmentations(&self, buffer: &str) -> Vec<Vec<String>> {
        segment(buffer, &self.dict)
    }

    fn compute(&self, buffer: &str) -> Vec<String> {
        if buffer.is_empty() {
            return Vec::new();
        }
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out: Vec<String> = Vec::new();

        if let Some(chars) = self.dict.lookup(buffer) {
            for c in chars {
                if out.len() >= self.max_candidates {
                    break;
                }
                if seen.insert(c) {
                    out.push(c.clone());
                }
            }
            tracing::debug!(buffer, found = out.len(), "exact match");
            return out;
        }

        let mut prefixed = 0usize;
        for (_, chars) in self.dict.prefix_scan(buffer) {
            prefixed += 1;
            for c in chars {
                if out.len() >= self.max_candidates {
                    break;
                }
                if seen.insert(c) {
                    out.push(c.clone());
                }
            }
            if out.len() >= self.max_candidates {
                break;
            }
        }
        if prefixed > 0 {
            tracing::debug!(buffer, syllables = prefixed, found = out.len(), "prefix match");
            return out;
        }

        if buffer.chars().count() < self.min_segmentation_len {
            tracing::debug!(buffer, "no match");
            return out;
        }

        let segmentations = segment(buffer, &self.dict);
        let total = self.max_candidates.min(TOTAL_CAP);
        let multi = generate_multi_char_candidates(
            &segmentations,
            &self.dict,
            self.per_segmentation_cap,
            total,
        );
        tracing::debug!(
            buffer,
            segmentations = segmentations.len(),
            found = multi.len(),
            "segmentation match"
        );
        multi
    }

    /// Get cache statistics for monitoring.
    ///
    /// Returns (hits, misses) tuple.
    pub fn cache_stats(&self) -> (usize, usize) {
        (*self.cache_hits.borrow(), *self.cache_misses.borrow())
    }

    /// Get cache hit rate as a percentage (0.0 to 100.0).
    ///
    /// Returns None if no cache accesses have been made yet.
    pub fn cache_hit_rate(&self) -> Option<f32> {
        let (hits, misses) = self.cache_stats();
        let total = hits + misses;
        if total == 0 {
            None
        } else {
            Some((hits as f32 / total as f32) * 100.0)
        }
    }

    pub fn cache_size(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn cache_capacity(&self) -> usize {
        self.cache.borrow().cap().get()
    }

    /// Clear the cache and its statistics.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
        *self.cache_hits.borrow_mut() = 0;
        *self.cache_misses.borrow_mut() = 0;
    }
}

impl CandidateProvider for PinyinProvider {
    fn candidates(&self, buffer: &str) -> Vec<String> {
        self.lookup(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_with(entries: &[(&str, &[&str])], config: &PinyinConfig) -> PinyinProvider {
        let mut dict = Dictionary::new();
        for (key, chars) in entries {
            for c in *chars {
                dict.insert(key, c);
            }
        }
        PinyinProvider::new(Arc::new(dict), config)
    }

    fn provider(entries: &[(&str, &[&str])]) -> PinyinProvider {
        provider_with(entries, &PinyinConfig::default())
    }

    #[test]
    fn exact_match_wins_over_prefix() {
        let p = provider(&[("ni", &["你", "尼", "你"]), ("niang", &["娘"])]);
        assert_eq!(p.lookup("ni"), vec!["你", "尼"]);
    }

    #[test]
    fn prefix_union_in_key_order() {
        let p = provider(&[("nian", &["年"]), ("niang", &["娘", "年"]), ("niao", &["鸟"])]);
        assert_eq!(p.lookup("nia"), vec!["年", "娘", "鸟"]);
    }

    #[test]
    fn long_prefix_match_skips_segmentation() {
        let p = provider(&[("niang", &["娘"]), ("ni", &["你"]), ("an", &["安"])]);
        assert_eq!(p.lookup("nian"), vec!["娘"]);
    }

    #[test]
    fn short_unknown_buffer_has_no_candidates() {
        let p = provider(&[("ni", &["你"]), ("hao", &["好"])]);
        assert!(p.lookup("nih").is_empty());
        assert!(p.lookup("").is_empty());
    }

    #[test]
    fn segmentation_fallback() {
        let p = provider(&[("ni", &["你", "尼"]), ("hao", &["好"])]);
        assert_eq!(p.lookup("nihao"), vec!["你好", "尼好"]);
        assert!(p.segmentations("nihao").contains(&vec!["ni".to_string(), "hao".to_string()]));
    }

    #[test]
    fn segmentation_threshold_is_configurable() {
        let config = PinyinConfig {
            min_segmentation_len: 6,
            ..PinyinConfig::default()
        };
        let p = provider_with(&[("ni", &["你"]), ("hao", &["好"])], &config);
        assert!(p.lookup("nihao").is_empty());
    }

    #[test]
    fn cache_tracks_hits_and_misses() {
        let p = provider(&[("ni", &["你"])]);
        assert_eq!(p.cache_hit_rate(), None);
        p.lookup("ni");
        p.lookup("ni");
        p.lookup("hao");
        assert_eq!(p.cache_stats(), (1, 2));
        assert_eq!(p.cache_size(), 2);
        p.clear_cache();
        assert_eq!(p.cache_stats(), (0, 0));
        assert_eq!(p.cache_size(), 0);
    }

    #[test]
    fn cache_respects_capacity() {
        let mut config = PinyinConfig::default();
        config.base.max_cache_size = 2;
        let p = provider_with(&[("a", &["啊"])], &config);
        for buf in ["a", "b", "c", "d"] {
            p.lookup(buf);
        }
        assert_eq!(p.cache_capacity(), 2);
        assert_eq!(p.cache_size(), 2);
    }
}
