//! Quest session: the per-player state machine.
//!
//! ```text
//! welcome -> playing -> completed -> minting -> minted
//!              |                        |
//!              +--------> error <-------+
//! ```
//!
//! `reset` returns any phase but `minting` to `welcome`. A wallet-connection
//! failure while in `welcome` also lands in `error`. Every other action
//! outside its phase is rejected with [`SessionError::InvalidTransition`] and
//! leaves the session untouched.

pub mod error;
pub mod phase;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::chain::{Address, ChainError, ChainGateway, ChainId, TokenId, Wallet};
use crate::narrative::{personality_type, NarrativeGenerator, NarrativeRequest};
use crate::questions::{Question, QuestionBank};
use crate::scoring::Scorer;
use crate::traits::{TraitBand, TraitKind, TraitVector};

pub use error::SessionError;
pub use phase::{MintRequest, QuestResult, SessionPhase};

/// Message recorded when the story could not be produced.
pub const STORY_FAILED_MESSAGE: &str = "Failed to generate AI story. Please try again.";

/// One player's run through the quest.
#[derive(Debug, Clone)]
pub struct QuestSession {
    id: Uuid,
    owner: Option<Address>,
    phase: SessionPhase,
    bank: Arc<QuestionBank>,
    scorer: Arc<dyn Scorer>,
    created_at: DateTime<Utc>,
}

impl QuestSession {
    pub fn new(bank: Arc<QuestionBank>, scorer: Arc<dyn Scorer>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner: None,
            phase: SessionPhase::Welcome,
            bank,
            scorer,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The connected wallet address, if any.
    pub fn owner(&self) -> Option<Address> {
        self.owner
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The question awaiting an answer.
    pub fn current_question(&self) -> Option<&Question> {
        match &self.phase {
            SessionPhase::Playing {
                questions, index, ..
            } => questions.get(*index),
            _ => None,
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            phase: self.phase.name(),
            action,
        }
    }

    fn transition(&mut self, next: SessionPhase) {
        log::info!(
            "session {}: {} -> {}",
            self.id,
            self.phase.name(),
            next.name()
        );
        self.phase = next;
    }

    // -----------------------------------------------------------------------
    // Actions
    // -----------------------------------------------------------------------

    /// Move `wallet` to `target` and record its address as the owner.
    ///
    /// Allowed in any phase. A failure while in `welcome` moves the session
    /// to `error`; elsewhere the phase is left alone.
    pub async fn connect_wallet(
        &mut self,
        wallet: &dyn Wallet,
        target: ChainId,
    ) -> Result<Address, SessionError> {
        let connected = match wallet.switch_chain(target).await {
            Ok(()) => wallet.address().await,
            Err(e) => Err(e),
        };

        match connected {
            Ok(address) => {
                log::info!("session {}: wallet {} connected", self.id, address);
                self.owner = Some(address);
                Ok(address)
            }
            Err(e) => {
                log::warn!("session {}: wallet connection failed: {}", self.id, e);
                if matches!(self.phase, SessionPhase::Welcome) {
                    self.transition(SessionPhase::Error {
                        message: e.to_string(),
                    });
                }
                Err(e.into())
            }
        }
    }

    /// `welcome -> playing` with [`QUEST_LENGTH`](crate::questions::QUEST_LENGTH)
    /// questions drawn in random order.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), SessionError> {
        if !matches!(self.phase, SessionPhase::Welcome) {
            return Err(self.invalid("start"));
        }
        let questions = self.bank.draw(rng);
        log::debug!(
            "session {}: question order {:?}",
            self.id,
            questions.iter().map(|q| q.id).collect::<Vec<_>>()
        );
        self.transition(SessionPhase::Playing {
            questions,
            index: 0,
            responses: Vec::new(),
            traits: TraitVector::default(),
        });
        Ok(())
    }

    /// Record an answer to the current question.
    ///
    /// The final answer asks `narrator` for the story before completing. If
    /// that fails the session moves to `error` and `Ok` is still returned,
    /// since the action itself was accepted.
    pub async fn answer(
        &mut self,
        answer: &str,
        narrator: &dyn NarrativeGenerator,
    ) -> Result<(), SessionError> {
        let request = match &mut self.phase {
            SessionPhase::Playing {
                questions,
                index,
                responses,
                traits,
            } => {
                let question = &questions[*index];
                if question.option(answer).is_none() {
                    return Err(SessionError::UnknownOption {
                        question_id: question.id,
                        answer: answer.to_string(),
                    });
                }

                *traits = self.scorer.score(traits, question, answer);
                responses.push(answer.to_string());
                log::debug!(
                    "session {}: answered question {} ({}/{}), traits now [{}]",
                    self.id,
                    question.id,
                    responses.len(),
                    questions.len(),
                    traits
                );

                if *index + 1 < questions.len() {
                    *index += 1;
                    return Ok(());
                }
                NarrativeRequest::new(*traits, responses.clone())
            }
            _ => return Err(self.invalid("answer")),
        };

        let next = match narrator.generate_story(&request).await {
            Ok(story) => SessionPhase::Completed {
                result: QuestResult {
                    personality_type: personality_type(&request.traits).to_string(),
                    responses: request.responses,
                    traits: request.traits,
                    story,
                },
            },
            Err(e) => {
                log::warn!(
                    "session {}: narrator '{}' failed: {}",
                    self.id,
                    narrator.name(),
                    e
                );
                SessionPhase::Error {
                    message: STORY_FAILED_MESSAGE.to_string(),
                }
            }
        };
        self.transition(next);
        Ok(())
    }

    /// `completed -> minting`. The request carries exactly the narrated traits.
    pub fn begin_mint(&mut self) -> Result<MintRequest, SessionError> {
        match std::mem::take(&mut self.phase) {
            SessionPhase::Completed { result } => {
                let request = MintRequest::from(&result);
                self.transition(SessionPhase::Minting { result });
                Ok(request)
            }
            other => {
                self.phase = other;
                Err(self.invalid("mint"))
            }
        }
    }

    /// `minting -> minted` on success, `minting -> error` otherwise.
    pub fn finish_mint(&mut self, outcome: Result<TokenId, ChainError>) -> Result<(), SessionError> {
        match std::mem::take(&mut self.phase) {
            SessionPhase::Minting { result } => {
                let next = match outcome {
                    Ok(token_id) => SessionPhase::Minted { result, token_id },
                    Err(e) => {
                        log::warn!("session {}: mint failed: {}", self.id, e);
                        SessionPhase::Error {
                            message: e.to_string(),
                        }
                    }
                };
                self.transition(next);
                Ok(())
            }
            other => {
                self.phase = other;
                Err(self.invalid("finish minting"))
            }
        }
    }

    /// Begin, submit through `gateway`, and finish in one call.
    pub async fn mint(&mut self, gateway: &ChainGateway) -> Result<(), SessionError> {
        let request = self.begin_mint()?;
        let outcome = gateway
            .mint(&request.traits, &request.story, &request.personality_type)
            .await;
        self.finish_mint(outcome)
    }

    /// Back to `welcome`. The wallet connection is kept.
    ///
    /// Refused while a mint is pending, so its outcome always lands on the
    /// run that requested it.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if matches!(self.phase, SessionPhase::Minting { .. }) {
            return Err(self.invalid("reset"));
        }
        self.transition(SessionPhase::Welcome);
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let progress = match &self.phase {
            SessionPhase::Playing {
                questions, index, ..
            } => Some(Progress {
                current: index + 1,
                total: questions.len(),
            }),
            _ => None,
        };

        let traits = self.phase.traits();
        SessionSnapshot {
            id: self.id,
            phase: self.phase.name(),
            owner: self.owner,
            question: self.current_question().map(QuestionView::from),
            progress,
            traits,
            bands: traits.bands(),
            result: self.phase.result().cloned(),
            token_id: self.phase.token_id(),
            error: self.phase.error_message().map(str::to_string),
            created_at: self.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Read-only, serializable view of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub phase: &'static str,
    pub owner: Option<Address>,
    pub question: Option<QuestionView>,
    pub progress: Option<Progress>,
    pub traits: TraitVector,
    /// Presentation band of each trait in `traits`.
    pub bands: BTreeMap<TraitKind, TraitBand>,
    pub result: Option<QuestResult>,
    pub token_id: Option<TokenId>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A question as shown to the player; scoring data is left out.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub id: u32,
    pub text: String,
    pub narrative: Option<String>,
    pub category: String,
    pub options: Vec<String>,
}

impl From<&Question> for QuestionView {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id,
            text: q.text.clone(),
            narrative: q.narrative.clone(),
            category: q.category.clone(),
            options: q.options.iter().map(|o| o.text.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// 1-based position of the current question.
    pub current: usize,
    pub total: usize,
}
