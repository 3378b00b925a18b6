//! Question bank: the static catalog of scenario prompts.
//!
//! A [`QuestionBank`] is immutable once built. Sessions draw
//! [`QUEST_LENGTH`] questions from it in random order at start; nothing
//! mutates a [`Question`] at runtime.
//!
//! # Example YAML
//!
//! ```yaml
//! questions:
//!   - id: 1
//!     text: "You discover a hidden treasure map. What do you do?"
//!     category: "Adventure & Risk"
//!     options:
//!       - "Follow it immediately, alone"
//!       - text: "Sell it to the highest bidder"
//!         adjustments: [100, 100, 90, 100, 130, 95]
//! ```

pub mod catalog;
pub mod error;

use std::collections::HashSet;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub use catalog::{adjustment_questions, keyword_questions};
pub use error::CatalogError;

/// Questions asked per quest. A catalog must hold at least this many.
pub const QUEST_LENGTH: usize = 5;

/// Upper bound accepted for a single adjustment percentage.
pub const MAX_ADJUSTMENT_PERCENT: u16 = 1000;

// ============================================================================
// AnswerOption
// ============================================================================

/// One selectable answer.
///
/// `adjustments`, when present, is the percentage tuple applied by the
/// adjustment scorer (100 leaves a trait unchanged).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OptionRepr")]
pub struct AnswerOption {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustments: Option<[u16; 6]>,
}

impl AnswerOption {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            adjustments: None,
        }
    }

    pub fn with_adjustments(text: impl Into<String>, adjustments: [u16; 6]) -> Self {
        Self {
            text: text.into(),
            adjustments: Some(adjustments),
        }
    }
}

/// YAML accepts either a bare string or a `{text, adjustments}` map.
#[derive(Deserialize)]
#[serde(untagged)]
enum OptionRepr {
    Plain(String),
    Full {
        text: String,
        #[serde(default)]
        adjustments: Option<[u16; 6]>,
    },
}

impl From<OptionRepr> for AnswerOption {
    fn from(repr: OptionRepr) -> Self {
        match repr {
            OptionRepr::Plain(text) => AnswerOption::plain(text),
            OptionRepr::Full { text, adjustments } => AnswerOption { text, adjustments },
        }
    }
}

// ============================================================================
// Question
// ============================================================================

/// A scenario prompt with its ordered answer options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    /// Optional flavour text shown before the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    /// Category label; the keyword scorer keys its rules on it.
    #[serde(default)]
    pub category: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// Find the option whose text is exactly `text`.
    pub fn option(&self, text: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.text == text)
    }

    pub fn option_texts(&self) -> Vec<&str> {
        self.options.iter().map(|o| o.text.as_str()).collect()
    }
}

// ============================================================================
// QuestionBank
// ============================================================================

#[derive(Debug, Deserialize)]
struct CatalogFile {
    questions: Vec<Question>,
}

/// A validated, ordered catalog of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, validating the catalog rules.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        validate(&questions)?;
        Ok(Self { questions })
    }

    /// The category-tagged catalog used with keyword scoring.
    pub fn keyword() -> Self {
        Self {
            questions: keyword_questions(),
        }
    }

    /// The narrated catalog whose options carry percentage adjustments.
    pub fn adjustment() -> Self {
        Self {
            questions: adjustment_questions(),
        }
    }

    /// Parse a catalog from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        Self::new(file.questions)
    }

    /// Parse a catalog from a YAML file on disk.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// A copy of every question in random order.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Question> {
        let mut questions = self.questions.clone();
        questions.shuffle(rng);
        questions
    }

    /// The questions for one quest: [`QUEST_LENGTH`] distinct questions in
    /// random order.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Question> {
        let mut questions = self.shuffled(rng);
        questions.truncate(QUEST_LENGTH);
        questions
    }

    /// A random question whose id is not in `exclude_ids`.
    pub fn random_excluding<R: Rng + ?Sized>(
        &self,
        exclude_ids: &[u32],
        rng: &mut R,
    ) -> Option<&Question> {
        let available: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| !exclude_ids.contains(&q.id))
            .collect();
        available.choose(rng).copied()
    }
}

fn validate(questions: &[Question]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for q in questions {
        if !seen.insert(q.id) {
            return Err(CatalogError::Validation(format!(
                "duplicate question id {}",
                q.id
            )));
        }
        if q.options.len() < 2 {
            return Err(CatalogError::Validation(format!(
                "question {} needs at least 2 options, has {}",
                q.id,
                q.options.len()
            )));
        }
        for opt in &q.options {
            if let Some(adj) = opt.adjustments {
                if let Some(pct) = adj.iter().find(|&&p| p > MAX_ADJUSTMENT_PERCENT) {
                    return Err(CatalogError::Validation(format!(
                        "question {} option '{}' has adjustment {}% (max {}%)",
                        q.id, opt.text, pct, MAX_ADJUSTMENT_PERCENT
                    )));
                }
            }
        }
    }

    if questions.len() < QUEST_LENGTH {
        return Err(CatalogError::Validation(format!(
            "catalog must contain at least {} questions, has {}",
            QUEST_LENGTH,
            questions.len()
        )));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
