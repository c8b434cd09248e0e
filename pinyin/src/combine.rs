//! Multi-character candidate generation.
//!
//! Each segmentation is expanded into the Cartesian product of its
//! syllables' characters, depth first, in dictionary order. Expansion stops
//! early once a segmentation has produced `per_segmentation` strings or the
//! whole call has produced `total` strings.

use crate::dictionary::Dictionary;
use std::collections::HashSet;

/// Default cap on strings produced by one segmentation.
pub const PER_SEGMENTATION_CAP: usize = 10;

/// Default cap on strings produced overall.
pub const TOTAL_CAP: usize = 20;

/// Characters of `syllable` with duplicates collapsed, first occurrence kept.
pub fn unique_chars<'a>(dict: &'a Dictionary, syllable: &str) -> Option<Vec<&'a str>> {
    let chars = dict.lookup(syllable)?;
    let mut seen = HashSet::new();
    Some(
        chars
            .iter()
            .map(String::as_str)
            .filter(|c| seen.insert(*c))
            .collect(),
    )
}

/// Expand segmentations into unique multi-character strings.
///
/// Segmentations containing a syllable missing from the dictionary are
/// skipped. Expansion stops mid-segmentation as soon as `total` unique
/// strings exist.
pub fn generate_multi_char_candidates(
    segmentations: &[Vec<String>],
    dict: &Dictionary,
    per_segmentation: usize,
    total: usize,
) -> Vec<String> {
    let mut out = Output {
        results: Vec::new(),
        seen: HashSet::new(),
        total,
    };

    for segmentation in segmentations {
        if out.is_full() {
            break;
        }
        let options: Option<Vec<Vec<&str>>> = segmentation
            .iter()
            .map(|syllable| unique_chars(dict, syllable))
            .collect();
        let Some(options) = options else {
            continue;
        };

        let mut produced = 0usize;
        let mut current = String::new();
        expand(&options, 0, &mut current, per_segmentation, &mut produced, &mut out);
    }

    tracing::debug!(
        segmentations = segmentations.len(),
        generated = out.results.len(),
        "generated multi-character candidates"
    );
    out.results
}

struct Output {
    results: Vec<String>,
    seen: HashSet<String>,
    total: usize,
}

impl Output {
    fn is_full(&self) -> bool {
        self.results.len() >= self.total
    }
}

/// Depth-first product. `produced` counts strings this segmentation yielded,
/// duplicates included.
fn expand(
    options: &[Vec<&str>],
    index: usize,
    current: &mut String,
    cap: usize,
    produced: &mut usize,
    out: &mut Output,
) {
    if *produced >= cap || out.is_full() {
        return;
    }
    if index == options.len() {
        *produced += 1;
        if out.seen.insert(current.clone()) {
            out.results.push(current.clone());
        }
        return;
    }
    for ch in &options[index] {
        let len = current.len();
        current.push_str(ch);
        expand(options, index + 1, current, cap, produced, out);
        current.truncate(len);
        if *produced >= cap || out.is_full() {
            break;
        }
    }
}
