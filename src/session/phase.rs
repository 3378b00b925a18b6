//! Session phases and the data each one carries.

use serde::{Deserialize, Serialize};

use crate::chain::TokenId;
use crate::questions::Question;
use crate::traits::TraitVector;

/// The outcome of a finished quest. Fixed once the session completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestResult {
    /// Chosen option texts in the order they were given.
    pub responses: Vec<String>,
    pub traits: TraitVector,
    pub story: String,
    pub personality_type: String,
}

/// What gets minted for a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintRequest {
    pub traits: TraitVector,
    pub story: String,
    pub personality_type: String,
}

impl From<&QuestResult> for MintRequest {
    fn from(result: &QuestResult) -> Self {
        Self {
            traits: result.traits,
            story: result.story.clone(),
            personality_type: result.personality_type.clone(),
        }
    }
}

/// Where a session is. Each variant holds only what is valid in it.
#[derive(Debug, Clone, Default)]
pub enum SessionPhase {
    #[default]
    Welcome,
    Playing {
        questions: Vec<Question>,
        index: usize,
        responses: Vec<String>,
        traits: TraitVector,
    },
    Completed {
        result: QuestResult,
    },
    /// A mint transaction is in flight.
    Minting {
        result: QuestResult,
    },
    Minted {
        result: QuestResult,
        token_id: TokenId,
    },
    Error {
        message: String,
    },
}

impl SessionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::Welcome => "welcome",
            SessionPhase::Playing { .. } => "playing",
            SessionPhase::Completed { .. } => "completed",
            SessionPhase::Minting { .. } => "minting",
            SessionPhase::Minted { .. } => "minted",
            SessionPhase::Error { .. } => "error",
        }
    }

    pub fn result(&self) -> Option<&QuestResult> {
        match self {
            SessionPhase::Completed { result }
            | SessionPhase::Minting { result }
            | SessionPhase::Minted { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn token_id(&self) -> Option<TokenId> {
        match self {
            SessionPhase::Minted { token_id, .. } => Some(*token_id),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            SessionPhase::Error { message } => Some(message),
            _ => None,
        }
    }

    /// The trait vector as the player would see it right now.
    pub fn traits(&self) -> TraitVector {
        match self {
            SessionPhase::Playing { traits, .. } => *traits,
            other => other.result().map(|r| r.traits).unwrap_or_default(),
        }
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result() -> QuestResult {
        QuestResult {
            responses: vec!["a".into()],
            traits: TraitVector::uniform(70),
            story: "S".into(),
            personality_type: "T".into(),
        }
    }

    #[test]
    fn test_token_id_only_when_minted() {
        assert_eq!(SessionPhase::Completed { result: result() }.token_id(), None);
        assert_eq!(SessionPhase::Minting { result: result() }.token_id(), None);
        let minted = SessionPhase::Minted {
            result: result(),
            token_id: TokenId(3),
        };
        assert_eq!(minted.token_id(), Some(TokenId(3)));
        assert_eq!(minted.name(), "minted");
    }

    #[test]
    fn test_traits_view() {
        assert_eq!(SessionPhase::Welcome.traits(), TraitVector::default());
        assert_eq!(
            SessionPhase::Completed { result: result() }.traits(),
            TraitVector::uniform(70)
        );
        let error = SessionPhase::Error {
            message: "boom".into(),
        };
        assert_eq!(error.error_message(), Some("boom"));
        assert_eq!(error.traits(), TraitVector::default());
    }

    #[test]
    fn test_mint_request_from_result() {
        let request = MintRequest::from(&result());
        assert_eq!(request.traits, TraitVector::uniform(70));
        assert_eq!(request.story, "S");
        assert_eq!(request.personality_type, "T");
    }
}
