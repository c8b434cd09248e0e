//! Tone normalization for romanized readings.
//!
//! Dictionary keys are canonical syllables: lower-case ASCII letters with
//! tone marks removed and `ü` written as `v`. Input goes through canonical
//! decomposition first, so precomposed (`ǎ`) and decomposed (`a` + U+030C)
//! spellings normalize identically.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const COMBINING_DIAERESIS: char = '\u{0308}';

/// Map a toned reading to its canonical dictionary key.
///
/// Pure and idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for ch in lowered.nfd() {
        if is_combining_mark(ch) {
            // u + diaeresis is the umlaut vowel, spelled `v` on keypads
            if ch == COMBINING_DIAERESIS && out.ends_with('u') {
                out.pop();
                out.push('v');
            }
            continue;
        }
        match ch {
            'ɡ' => out.push('g'),
            'ŋ' => out.push_str("ng"),
            'ɑ' => out.push('a'),
            'ɨ' => out.push('i'),
            'ɯ' => out.push('u'),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_all_four_tones() {
        assert_eq!(normalize("mā"), "ma");
        assert_eq!(normalize("má"), "ma");
        assert_eq!(normalize("mǎ"), "ma");
        assert_eq!(normalize("mà"), "ma");
        assert_eq!(normalize("nǐ hǎo"), "ni hao");
        assert_eq!(normalize("xiōng"), "xiong");
        assert_eq!(normalize("lüè"), "lve");
    }

    #[test]
    fn umlaut_becomes_v() {
        assert_eq!(normalize("lǜ"), "lv");
        assert_eq!(normalize("nǚ"), "nv");
        assert_eq!(normalize("ü"), "v");
        assert_eq!(normalize("Ǖ"), "v");
    }

    #[test]
    fn syllabic_nasals() {
        assert_eq!(normalize("ń"), "n");
        assert_eq!(normalize("ň"), "n");
        assert_eq!(normalize("ǹg"), "ng");
        assert_eq!(normalize("ḿ"), "m");
    }

    #[test]
    fn ipa_lookalikes() {
        assert_eq!(normalize("ɡē"), "ge");
        assert_eq!(normalize("ŋ"), "ng");
        assert_eq!(normalize("hɑo"), "hao");
        assert_eq!(normalize("zɨ"), "zi");
        assert_eq!(normalize("ɯ"), "u");
    }

    #[test]
    fn decomposed_input_matches_precomposed() {
        assert_eq!(normalize("a\u{030C}"), normalize("ǎ"));
        assert_eq!(normalize("u\u{0308}\u{0301}"), "v");
    }

    #[test]
    fn lowercases() {
        assert_eq!(normalize("NǏ"), "ni");
    }

    #[test]
    fn idempotent() {
        for s in ["nǐ", "Lǘ", "ŋ", "İ", "ɡuó", "", "hello", "ê"] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input {:?}", s);
        }
    }
}
