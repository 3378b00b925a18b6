//! Keyword scoring: category-scoped substring rules with additive deltas.

use crate::questions::catalog::{
    ADVENTURE_AND_RISK, CREATIVITY_AND_INNOVATION, JUSTICE_AND_EMPATHY, PROBLEM_SOLVING,
    RESOURCE_MANAGEMENT,
};
use crate::questions::Question;
use crate::traits::{TraitKind, TraitVector};

use super::Scorer;

/// Points added per matching rule.
pub const KEYWORD_DELTA: i32 = 10;

/// A single `(category, needle) → trait += delta` rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub category: String,
    pub needle: String,
    pub kind: TraitKind,
    pub delta: i32,
}

impl KeywordRule {
    pub fn new(category: &str, needle: &str, kind: TraitKind, delta: i32) -> Self {
        Self {
            category: category.to_string(),
            needle: needle.to_string(),
            kind,
            delta,
        }
    }

    /// Case-sensitive containment, scoped to the rule's category.
    pub fn matches(&self, category: &str, answer: &str) -> bool {
        self.category == category && answer.contains(self.needle.as_str())
    }
}

/// Scores answers by matching the literal answer text against a rule table.
///
/// Matching is case-sensitive, so the capitalized "Research the map..." does
/// not trigger the lowercase `research` rule. Every matching rule applies.
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    rules: Vec<KeywordRule>,
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl KeywordScorer {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// Deltas produced by `answer` under `category`, in rule order.
    pub fn deltas(&self, category: &str, answer: &str) -> Vec<(TraitKind, i32)> {
        self.rules
            .iter()
            .filter(|r| r.matches(category, answer))
            .map(|r| (r.kind, r.delta))
            .collect()
    }
}

impl Scorer for KeywordScorer {
    fn score(&self, traits: &TraitVector, question: &Question, answer: &str) -> TraitVector {
        let deltas = self.deltas(&question.category, answer);
        log::debug!(
            "keyword scoring: question={}, category={:?}, matches={}",
            question.id,
            question.category,
            deltas.len()
        );
        traits.apply_deltas(&deltas)
    }
}

/// The fixed rule table for the built-in keyword catalog.
pub fn default_rules() -> Vec<KeywordRule> {
    use TraitKind::*;

    let table: [(&str, [(&str, TraitKind); 4]); 5] = [
        (
            ADVENTURE_AND_RISK,
            [
                ("immediately", Bravery),
                ("research", Logic),
                ("share", Empathy),
                ("sell", Greed),
            ],
        ),
        (
            PROBLEM_SOLVING,
            [
                ("solve", Logic),
                ("guide", Wisdom),
                ("support", Empathy),
                ("figure", Bravery),
            ],
        ),
        (
            CREATIVITY_AND_INNOVATION,
            [
                ("proven", Logic),
                ("experiment", Creativity),
                ("collaborate", Empathy),
                ("efficiency", Wisdom),
            ],
        ),
        (
            JUSTICE_AND_EMPATHY,
            [
                ("intervene", Bravery),
                ("document", Logic),
                ("support", Empathy),
                ("avoid", Wisdom),
            ],
        ),
        (
            RESOURCE_MANAGEMENT,
            [
                ("immediate", Greed),
                ("sustainability", Wisdom),
                ("help others", Empathy),
                ("analyze", Logic),
            ],
        ),
    ];

    table
        .iter()
        .flat_map(|(category, needles)| {
            needles
                .iter()
                .map(move |(needle, kind)| KeywordRule::new(category, needle, *kind, KEYWORD_DELTA))
        })
        .collect()
}
