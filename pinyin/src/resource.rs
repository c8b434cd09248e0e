//! Dictionary resource decoding.
//!
//! The resource associates one character with one or more toned readings.
//! Two layouts are accepted:
//!
//! ```text
//! [ {"char": "你", "pinyin": ["nǐ"]}, {"char": "好", "pinyin": ["hǎo", "hào"]} ]
//! ```
//!
//! or one object per line. `pinyin` may also be a single string. Records that
//! cannot be decoded, lack a character or have no readings are skipped one by
//! one. An array that does not parse as a whole (truncated file, stray comma)
//! is rescanned object by object, so every complete record still loads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One character with its toned readings, as found in the resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictRecord {
    #[serde(rename = "char")]
    pub character: String,
    pub pinyin: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Readings {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(rename = "char", default)]
    character: Option<String>,
    #[serde(default)]
    pinyin: Option<Readings>,
}

/// Decode every well-formed record in `text`.
pub fn decode_records(text: &str) -> Vec<DictRecord> {
    let trimmed = text.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let values: Vec<Value> = if trimmed.starts_with('[') {
        match serde_json::from_str::<Vec<Value>>(trimmed) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(error = %e, "malformed dictionary array, recovering complete records");
                scan_objects(trimmed)
            }
        }
    } else {
        trimmed
            .lines()
            .map(|line| line.trim().trim_end_matches(','))
            .filter(|line| !line.is_empty())
            .filter_map(|line| match serde_json::from_str::<Value>(line) {
                Ok(v) => Some(v),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping undecodable dictionary line");
                    None
                }
            })
            .collect()
    };

    let total = values.len();
    let records: Vec<DictRecord> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| to_record(index, value))
        .collect();
    if records.len() < total {
        tracing::warn!(
            skipped = total - records.len(),
            total,
            "skipped malformed dictionary records"
        );
    }
    records
}

/// Decode each `{...}` object in `body`, resyncing on the next `{` after a
/// failure.
fn scan_objects(body: &str) -> Vec<Value> {
    let mut values = Vec::new();
    let mut pos = 0;
    while let Some(offset) = body[pos..].find('{') {
        let start = pos + offset;
        let mut stream = serde_json::Deserializer::from_str(&body[start..]).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) => {
                values.push(value);
                pos = start + stream.byte_offset();
            }
            Some(Err(e)) => {
                tracing::debug!(offset = start, error = %e, "skipping undecodable record");
                pos = start + 1;
            }
            None => break,
        }
    }
    values
}

fn to_record(index: usize, value: Value) -> Option<DictRecord> {
    let raw: RawRecord = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!(index, error = %e, "record is not an object");
            return None;
        }
    };
    let character = raw.character.filter(|c| !c.is_empty())?;
    let pinyin: Vec<String> = match raw.pinyin? {
        Readings::One(r) => vec![r],
        Readings::Many(rs) => rs,
    }
    .into_iter()
    .filter(|r| !r.trim().is_empty())
    .collect();
    if pinyin.is_empty() {
        tracing::debug!(index, character = %character, "record has no readings");
        return None;
    }
    Some(DictRecord { character, pinyin })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_array() {
        let text = r#"[
            {"char": "你", "pinyin": ["nǐ"]},
            {"char": "好", "pinyin": ["hǎo", "hào"]}
        ]"#;
        let records = decode_records(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].character, "好");
        assert_eq!(records[1].pinyin, vec!["hǎo", "hào"]);
    }

    #[test]
    fn decodes_line_stream() {
        let text = "{\"char\": \"你\", \"pinyin\": \"nǐ\"}\n{\"char\": \"尼\", \"pinyin\": [\"ní\"]},\n";
        let records = decode_records(text);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].pinyin, vec!["nǐ"]);
    }

    #[test]
    fn skips_bad_records_individually() {
        let text = r#"[
            {"char": "你", "pinyin": ["nǐ"]},
            {"pinyin": ["hǎo"]},
            {"char": "", "pinyin": ["a"]},
            {"char": "空", "pinyin": []},
            {"char": "数", "pinyin": 5},
            42,
            {"char": "尼", "pinyin": ["ní"], "extra": true}
        ]"#;
        let records = decode_records(text);
        let chars: Vec<&str> = records.iter().map(|r| r.character.as_str()).collect();
        assert_eq!(chars, vec!["你", "尼"]);
    }

    #[test]
    fn skips_bad_lines_in_stream() {
        let text = "{\"char\": \"你\", \"pinyin\": [\"nǐ\"]}\nnot json\n{\"char\": \"好\", \"pinyin\": [\"hǎo\"]}\n";
        assert_eq!(decode_records(text).len(), 2);
    }

    #[test]
    fn truncated_array_keeps_complete_records() {
        let text = "[\n {\"char\": \"你\", \"pinyin\": [\"nǐ\"]},\n {\"char\": \"好\", \"pinyin\": [\"hǎo\"]},\n {\"char\": \"尼\", \"pin";
        let chars: Vec<String> = decode_records(text).into_iter().map(|r| r.character).collect();
        assert_eq!(chars, vec!["你", "好"]);
    }

    #[test]
    fn trailing_comma_keeps_records() {
        let text = r#"[{"char": "你", "pinyin": ["nǐ"]}, {"char": "好", "pinyin": ["hǎo"]},]"#;
        assert_eq!(decode_records(text).len(), 2);
    }

    #[test]
    fn broken_record_mid_array_is_skipped() {
        let text = r#"[{"char": "你", "pinyin": ["nǐ"]}, {"char": "坏" "pinyin": ["huài"]}, {"char": "好", "pinyin": ["hǎo"]}]"#;
        let chars: Vec<String> = decode_records(text).into_iter().map(|r| r.character).collect();
        assert_eq!(chars, vec!["你", "好"]);
    }

    #[test]
    fn unreadable_resource_yields_nothing() {
        assert!(decode_records("[{\"char\": \"你\"").is_empty());
        assert!(decode_records("[not json]").is_empty());
        assert!(decode_records("").is_empty());
    }
}
