//! Scoring engine: turns one answer into an updated trait vector.
//!
//! Two designs are supported and selected per host through [`ScoringMode`]:
//!
//! - [`KeywordScorer`]: case-sensitive substring rules scoped by question
//!   category, each match adding a fixed delta.
//! - [`AdjustmentScorer`]: the chosen option carries six percentages that
//!   scale the current values.
//!
//! Both are pure: they return a new vector and touch nothing else. Every
//! result is clamped to `0..=100` by [`TraitVector`].

pub mod adjustment;
pub mod keyword;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::questions::{Question, QuestionBank};
use crate::traits::TraitVector;

pub use adjustment::AdjustmentScorer;
pub use keyword::{default_rules, KeywordRule, KeywordScorer, KEYWORD_DELTA};

/// Maps `(current traits, question, literal answer)` to new traits.
pub trait Scorer: Send + Sync + fmt::Debug {
    fn score(&self, traits: &TraitVector, question: &Question, answer: &str) -> TraitVector;
}

/// Which scoring design a host runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    #[default]
    Keyword,
    Adjustment,
}

impl ScoringMode {
    /// A scorer implementing this mode.
    pub fn scorer(self) -> Box<dyn Scorer> {
        match self {
            ScoringMode::Keyword => Box::new(KeywordScorer::default()),
            ScoringMode::Adjustment => Box::new(AdjustmentScorer),
        }
    }

    /// The built-in catalog written for this mode.
    pub fn default_bank(self) -> QuestionBank {
        match self {
            ScoringMode::Keyword => QuestionBank::keyword(),
            ScoringMode::Adjustment => QuestionBank::adjustment(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoringMode::Keyword => "keyword",
            ScoringMode::Adjustment => "adjustment",
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keyword" => Ok(ScoringMode::Keyword),
            "adjustment" => Ok(ScoringMode::Adjustment),
            other => Err(format!(
                "unknown scoring mode '{}' (expected 'keyword' or 'adjustment')",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!("keyword".parse::<ScoringMode>().unwrap(), ScoringMode::Keyword);
        assert_eq!(
            " Adjustment ".parse::<ScoringMode>().unwrap(),
            ScoringMode::Adjustment
        );
        assert!("random".parse::<ScoringMode>().is_err());
    }

    #[test]
    fn test_mode_scorer_matches_bank() {
        for mode in [ScoringMode::Keyword, ScoringMode::Adjustment] {
            let scorer = mode.scorer();
            let bank = mode.default_bank();
            let mut traits = TraitVector::default();
            for q in bank.questions() {
                traits = scorer.score(&traits, q, &q.options[0].text);
                assert!(traits.as_array().iter().all(|&v| v <= 100));
            }
            assert_ne!(traits, TraitVector::default(), "mode {} had no effect", mode);
        }
    }
}
