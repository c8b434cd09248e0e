//! Multi-syllable segmentation search.
//!
//! Used when a buffer such as `nihao` is neither a syllable nor a prefix of
//! one. A forward dynamic program collects every way of cutting the buffer
//! into dictionary syllables:
//!
//! ```text
//! dp[0] = { [] }
//! dp[i] = ⋃ { s + [buf[j..i]] : j < i, buf[j..i] in dictionary, s in dp[j] }
//! ```

use crate::dictionary::Dictionary;

/// Default minimum buffer length (in characters) before segmentation is tried.
pub const MIN_SEGMENTATION_LEN: usize = 4;

/// Every decomposition of `buffer` into dictionary syllables.
///
/// Results are grouped by the position of the last cut, earliest cut first,
/// and within a group follow the order of the shorter prefixes. An empty
/// buffer, or one that cannot be fully covered, yields no segmentations.
pub fn segment(buffer: &str, dict: &Dictionary) -> Vec<Vec<String>> {
    if buffer.is_empty() {
        return Vec::new();
    }

    // Cut positions are char boundaries so non-ASCII input never panics.
    let bounds: Vec<usize> = buffer
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(buffer.len()))
        .collect();
    let n = bounds.len() - 1;

    let mut dp: Vec<Vec<Vec<String>>> = vec![Vec::new(); n + 1];
    dp[0].push(Vec::new());

    for i in 1..=n {
        for j in 0..i {
            if dp[j].is_empty() {
                continue;
            }
            let piece = &buffer[bounds[j]..bounds[i]];
            if !dict.contains(piece) {
                continue;
            }
            let extended: Vec<Vec<String>> = dp[j]
                .iter()
                .map(|prev| {
                    let mut next = prev.clone();
                    next.push(piece.to_string());
                    next
                })
                .collect();
            dp[i].extend(extended);
        }
    }

    let result = dp.pop().unwrap_or_default();
    tracing::debug!(buffer, segmentations = result.len(), "segmented buffer");
    result
}
