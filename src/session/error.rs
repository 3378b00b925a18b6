//! Session errors.

use thiserror::Error;

use crate::chain::ChainError;

/// Rejections of a session action. None of these change the phase except
/// where noted on the action itself.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Cannot {action} while the session is {phase}")]
    InvalidTransition {
        phase: &'static str,
        action: &'static str,
    },

    #[error("'{answer}' is not an option for question {question_id}")]
    UnknownOption { question_id: u32, answer: String },

    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl SessionError {
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, SessionError::InvalidTransition { .. })
    }
}
