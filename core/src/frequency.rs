//! Adaptive usage model.
//!
//! Every committed candidate bumps a counter. The table is bounded: once it
//! holds `capacity` entries, a newcomer can only enter by displacing the least
//! used entry, and only if that entry is strictly less used than the
//! newcomer. Persisted as one `<text>:<count>` line per entry.

use std::collections::HashMap;

/// Default maximum number of tracked strings.
pub const MAX_FREQ_ENTRIES: usize = 500;

/// Default number of commits between amortized flushes.
pub const FLUSH_INTERVAL: u32 = 100;

/// Bounded map from committed string to usage count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyModel {
    counts: HashMap<String, u32>,
    capacity: usize,
}

impl FrequencyModel {
    /// Create an empty model with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(MAX_FREQ_ENTRIES)
    }

    /// Create an empty model holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            counts: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Learn one use of `text`.
    ///
    /// Returns the stored count after learning, or 0 when the model is full
    /// and no entry is less used than the newcomer.
    pub fn learn(&mut self, text: &str) -> u32 {
        if text.is_empty() {
            return 0;
        }

        let count = {
            let entry = self.counts.entry(text.to_string()).or_insert(0);
            *entry = entry.saturating_add(1);
            *entry
        };

        if self.counts.len() > self.capacity {
            match self.least_used_except(text) {
                Some((victim, min)) if min < count => {
                    self.counts.remove(&victim);
                    tracing::info!(evicted = %victim, count = min, "removed low-frequency entry");
                }
                _ => {
                    self.counts.remove(text);
                    tracing::debug!(text, "frequency table full, newcomer not tracked");
                    return 0;
                }
            }
        }
        count
    }

    /// Usage count of `text` (0 when unknown).
    pub fn frequency(&self, text: &str) -> u32 {
        self.counts.get(text).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over all `(text, count)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Export a snapshot of the current data.
    pub fn snapshot(&self) -> HashMap<String, u32> {
        self.counts.clone()
    }

    /// Entries sorted by count descending, then text ascending.
    pub fn top(&self, limit: usize) -> Vec<(String, u32)> {
        let mut entries: Vec<(String, u32)> =
            self.iter().map(|(k, v)| (k.to_string(), v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        entries.truncate(limit);
        entries
    }

    /// Parse persisted `<text>:<count>` lines.
    ///
    /// Blank lines, lines without a colon and lines whose count is not a
    /// positive integer are skipped. The split happens at the last colon so
    /// committed text may itself contain colons. If the record holds more
    /// entries than `capacity`, the most used ones are kept.
    pub fn parse_records(text: &str, capacity: usize) -> Self {
        let mut model = Self::with_capacity(capacity);
        let mut skipped = 0usize;
        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            // Only the count is trimmed; the text keeps its own whitespace.
            let Some((key, count)) = line.rsplit_once(':') else {
                skipped += 1;
                continue;
            };
            match count.trim().parse::<i64>() {
                Ok(n) if n > 0 && !key.is_empty() => {
                    let n = u32::try_from(n).unwrap_or(u32::MAX);
                    model.counts.insert(key.to_string(), n);
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::debug!(skipped, "ignored malformed frequency records");
        }
        model.shrink_to_capacity();
        model
    }

    /// Serialize positive entries as `<text>:<count>` lines.
    pub fn to_records(&self) -> String {
        let mut out = String::new();
        for (text, count) in self.iter().filter(|(_, c)| *c > 0) {
            out.push_str(text);
            out.push(':');
            out.push_str(&count.to_string());
            out.push('\n');
        }
        out
    }

    fn least_used_except(&self, skip: &str) -> Option<(String, u32)> {
        self.counts
            .iter()
            .filter(|(k, _)| k.as_str() != skip)
            .min_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(b.0)))
            .map(|(k, v)| (k.clone(), *v))
    }

    fn shrink_to_capacity(&mut self) {
        if self.counts.len() <= self.capacity {
            return;
        }
        let keep: HashMap<String, u32> = self.top(self.capacity).into_iter().collect();
        tracing::info!(
            dropped = self.counts.len() - keep.len(),
            "frequency record exceeds capacity"
        );
        self.counts = keep;
    }
}

impl Default for FrequencyModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Counter deciding when the amortized flush is due.
#[derive(Debug, Clone)]
pub struct FlushSchedule {
    interval: u32,
    pending: u32,
}

impl FlushSchedule {
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            pending: 0,
        }
    }

    /// Count one commit; true when this commit should trigger a flush.
    pub fn tick(&mut self) -> bool {
        self.pending += 1;
        if self.pending >= self.interval {
            self.pending = 0;
            true
        } else {
            false
        }
    }

    /// Commits counted since the last flush.
    pub fn pending(&self) -> u32 {
        self.pending
    }

    pub fn reset(&mut self) {
        self.pending = 0;
    }
}

impl Default for FlushSchedule {
    fn default() -> Self {
        Self::new(FLUSH_INTERVAL)
    }
}
