//! Personality contract state machine.
//!
//! [`MindQuestLedger`] is the contract's storage and entry points, kept free
//! of any transport: callers pass the sender address and block timestamp the
//! way the EVM would. State-changing calls either fully apply and queue their
//! logs, or return a [`ContractError`] and change nothing.

use std::collections::{BTreeMap, HashMap};

use base64::Engine;
use serde::Serialize;

use crate::questions::QuestionBank;
use crate::traits::TraitVector;

use super::error::ContractError;
use super::types::{Address, ContractEvent, PersonalityRecord, TokenId};

pub const TOKEN_NAME: &str = "MindQuest Personality";
pub const TOKEN_SYMBOL: &str = "MQP";

/// Responses required before a multi-step session may complete.
pub const MIN_SESSION_RESPONSES: usize = 5;

/// A multi-step quest recorded on chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerSession {
    pub id: u64,
    pub player: Address,
    pub traits: TraitVector,
    /// `(question id, option index)` in submission order.
    pub responses: Vec<(u32, usize)>,
    pub completed: bool,
    pub token_id: Option<TokenId>,
}

#[derive(Debug, Serialize)]
struct MetadataAttribute<'a> {
    trait_type: &'a str,
    value: serde_json::Value,
}

/// In-memory personality NFT contract.
#[derive(Debug, Clone)]
pub struct MindQuestLedger {
    owner: Address,
    token_counter: u64,
    records: BTreeMap<TokenId, PersonalityRecord>,
    owners: BTreeMap<TokenId, Address>,
    session_counter: u64,
    sessions: HashMap<u64, LedgerSession>,
    questions: QuestionBank,
    pending_logs: Vec<ContractEvent>,
}

impl MindQuestLedger {
    /// Deploy with `owner` as the contract owner and the built-in
    /// adjustment catalog for multi-step sessions.
    pub fn new(owner: Address) -> Self {
        Self::with_questions(owner, QuestionBank::adjustment())
    }

    pub fn with_questions(owner: Address, questions: QuestionBank) -> Self {
        Self {
            owner,
            token_counter: 0,
            records: BTreeMap::new(),
            owners: BTreeMap::new(),
            session_counter: 0,
            sessions: HashMap::new(),
            questions,
            pending_logs: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        TOKEN_NAME
    }

    pub fn symbol(&self) -> &str {
        TOKEN_SYMBOL
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Logs emitted since the last drain, in emission order.
    pub fn drain_logs(&mut self) -> Vec<ContractEvent> {
        std::mem::take(&mut self.pending_logs)
    }

    // -----------------------------------------------------------------------
    // Single-call mint
    // -----------------------------------------------------------------------

    /// Mint a token to `caller`. Any caller, any string lengths.
    pub fn mint_personality_nft(
        &mut self,
        caller: Address,
        traits: TraitVector,
        story: &str,
        personality_type: &str,
        timestamp: u64,
    ) -> TokenId {
        self.token_counter += 1;
        let token_id = TokenId(self.token_counter);

        self.owners.insert(token_id, caller);
        self.records.insert(
            token_id,
            PersonalityRecord {
                player: caller,
                traits,
                ai_generated_story: story.to_string(),
                personality_type: personality_type.to_string(),
                timestamp,
            },
        );

        self.pending_logs.push(ContractEvent::Transfer {
            from: Address::ZERO,
            to: caller,
            token_id,
        });
        self.pending_logs.push(ContractEvent::NftMinted {
            player: caller,
            token_id,
            personality_type: personality_type.to_string(),
            traits,
        });
        token_id
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    pub fn total_minted(&self) -> u64 {
        self.token_counter
    }

    pub fn personality_data(&self, token_id: TokenId) -> Result<&PersonalityRecord, ContractError> {
        self.records
            .get(&token_id)
            .ok_or(ContractError::UnknownToken(token_id))
    }

    pub fn token_traits(&self, token_id: TokenId) -> Result<TraitVector, ContractError> {
        self.personality_data(token_id).map(|r| r.traits)
    }

    pub fn owner_of(&self, token_id: TokenId) -> Result<Address, ContractError> {
        self.owners
            .get(&token_id)
            .copied()
            .ok_or(ContractError::UnknownToken(token_id))
    }

    /// `data:application/json;base64,` metadata for marketplaces.
    pub fn token_uri(&self, token_id: TokenId) -> Result<String, ContractError> {
        let record = self.personality_data(token_id)?;

        let mut attributes: Vec<MetadataAttribute<'_>> = record
            .traits
            .iter()
            .map(|(kind, value)| MetadataAttribute {
                trait_type: kind.display_name(),
                value: serde_json::json!(value),
            })
            .collect();
        attributes.push(MetadataAttribute {
            trait_type: "Personality Type",
            value: serde_json::json!(record.personality_type),
        });

        let metadata = serde_json::json!({
            "name": format!("{} #{}", TOKEN_NAME, token_id.0),
            "description": record.ai_generated_story,
            "attributes": attributes,
        });
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(metadata.to_string().as_bytes());
        Ok(format!("data:application/json;base64,{}", encoded))
    }

    // -----------------------------------------------------------------------
    // Multi-step sessions
    // -----------------------------------------------------------------------

    /// Open a session owned by `caller`; traits start at the defaults.
    pub fn start_session(&mut self, caller: Address) -> u64 {
        self.session_counter += 1;
        let id = self.session_counter;
        self.sessions.insert(
            id,
            LedgerSession {
                id,
                player: caller,
                traits: TraitVector::default(),
                responses: Vec::new(),
                completed: false,
                token_id: None,
            },
        );
        self.pending_logs.push(ContractEvent::SessionStarted {
            session_id: id,
            player: caller,
        });
        id
    }

    pub fn session(&self, session_id: u64) -> Result<&LedgerSession, ContractError> {
        self.sessions
            .get(&session_id)
            .ok_or(ContractError::UnknownSession(session_id))
    }

    /// Record one answer and apply its adjustment tuple.
    pub fn submit_response(
        &mut self,
        caller: Address,
        session_id: u64,
        question_id: u32,
        option_index: usize,
    ) -> Result<TraitVector, ContractError> {
        let session = self.open_session_of(caller, session_id)?;
        let adjustments = self
            .questions
            .get(question_id)
            .and_then(|q| q.options.get(option_index))
            .and_then(|o| o.adjustments)
            .ok_or(ContractError::InvalidResponse)?;

        let traits = session.traits.apply_percentages(adjustments);
        let session = self
            .sessions
            .get_mut(&session_id)
            .ok_or(ContractError::UnknownSession(session_id))?;
        session.traits = traits;
        session.responses.push((question_id, option_index));

        self.pending_logs.push(ContractEvent::ResponseSubmitted {
            session_id,
            question_id,
            option_index,
        });
        Ok(traits)
    }

    /// Close the session and mint its final vector to the starter.
    pub fn complete_session(
        &mut self,
        caller: Address,
        session_id: u64,
        story: &str,
        personality_type: &str,
        timestamp: u64,
    ) -> Result<TokenId, ContractError> {
        let session = self.open_session_of(caller, session_id)?;
        if session.responses.len() < MIN_SESSION_RESPONSES {
            return Err(ContractError::NeedMoreResponses {
                have: session.responses.len(),
                need: MIN_SESSION_RESPONSES,
            });
        }
        let traits = session.traits;

        let token_id = self.mint_personality_nft(caller, traits, story, personality_type, timestamp);
        if let Some(session) = self.sessions.get_mut(&session_id) {
            session.completed = true;
            session.token_id = Some(token_id);
        }
        self.pending_logs.push(ContractEvent::SessionCompleted {
            session_id,
            token_id,
        });
        Ok(token_id)
    }

    fn open_session_of(
        &self,
        caller: Address,
        session_id: u64,
    ) -> Result<&LedgerSession, ContractError> {
        let session = self.session(session_id)?;
        if session.player != caller {
            return Err(ContractError::NotYourSession);
        }
        if session.completed {
            return Err(ContractError::SessionCompleted);
        }
        Ok(session)
    }
}
