//! Candidate ranking by learned usage.

use crate::candidate::Candidate;
use crate::frequency::FrequencyModel;

/// Order `raw` by usage count descending, then by text ascending.
///
/// The sort is total, so equal inputs always rank identically.
pub fn rank(raw: Vec<String>, model: &FrequencyModel) -> Vec<Candidate> {
    let mut ranked: Vec<Candidate> = raw
        .into_iter()
        .map(|text| {
            let frequency = model.frequency(&text);
            Candidate::new(text, frequency)
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| a.text.cmp(&b.text))
    });
    if let Some(head) = ranked.first() {
        tracing::debug!(head = %head.text, total = ranked.len(), "ranked candidates");
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(c: &[Candidate]) -> Vec<&str> {
        c.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn equal_frequency_orders_by_text() {
        let model = FrequencyModel::new();
        let ranked = rank(vec!["尼".into(), "你".into()], &model);
        assert_eq!(texts(&ranked), vec!["你", "尼"]);
    }

    #[test]
    fn learned_candidates_move_up() {
        let mut model = FrequencyModel::new();
        model.learn("尼");
        let ranked = rank(vec!["你".into(), "尼".into(), "泥".into()], &model);
        assert_eq!(texts(&ranked), vec!["尼", "你", "泥"]);
        assert_eq!(ranked[0].frequency, 1);
    }

    #[test]
    fn ranking_is_order_independent() {
        let mut model = FrequencyModel::new();
        model.learn("b");
        let a = rank(vec!["c".into(), "a".into(), "b".into()], &model);
        let b = rank(vec!["b".into(), "c".into(), "a".into()], &model);
        assert_eq!(a, b);
    }
}
