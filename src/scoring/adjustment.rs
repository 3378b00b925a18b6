//! Adjustment scoring: per-option multiplicative percentages.

use crate::questions::Question;
use crate::traits::TraitVector;

use super::Scorer;

/// Applies the percentage tuple carried by the chosen option.
///
/// The option is located by exact text. An unknown answer, or an option
/// without a tuple, leaves the vector unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjustmentScorer;

impl Scorer for AdjustmentScorer {
    fn score(&self, traits: &TraitVector, question: &Question, answer: &str) -> TraitVector {
        match question.option(answer).and_then(|o| o.adjustments) {
            Some(pct) => {
                log::debug!("adjustment scoring: question={}, pct={:?}", question.id, pct);
                traits.apply_percentages(pct)
            }
            None => *traits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questions::QuestionBank;

    #[test]
    fn test_applies_option_tuple() {
        let bank = QuestionBank::adjustment();
        let q = bank.get(1).unwrap();
        let out = AdjustmentScorer.score(
            &TraitVector::default(),
            q,
            "Take the money and leave the wallet",
        );
        assert_eq!(out.as_array(), [55, 50, 40, 50, 65, 40]);
    }

    #[test]
    fn test_unknown_answer_is_noop() {
        let bank = QuestionBank::adjustment();
        let q = bank.get(2).unwrap();
        let out = AdjustmentScorer.score(&TraitVector::default(), q, "take the job immediately");
        assert_eq!(out, TraitVector::default());
    }

    #[test]
    fn test_repeated_boosts_clamp() {
        let bank = QuestionBank::adjustment();
        let q = bank.get(3).unwrap();
        let mut traits = TraitVector::default();
        for _ in 0..10 {
            traits = AdjustmentScorer.score(&traits, q, "Immediately step in to help");
        }
        assert_eq!(traits.bravery, 100);
        assert!(traits.as_array().iter().all(|&v| v <= 100));
    }

    #[test]
    fn test_plain_option_is_noop() {
        let bank = QuestionBank::keyword();
        let q = bank.get(1).unwrap();
        let out = AdjustmentScorer.score(&TraitVector::default(), q, "Sell it to the highest bidder");
        assert_eq!(out, TraitVector::default());
    }
}
