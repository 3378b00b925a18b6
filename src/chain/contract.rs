//! Contract access: the [`PersonalityContract`] seam and the in-process
//! [`LocalChain`] that backs it for development and tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};

use crate::traits::TraitVector;

use super::error::{ChainError, ContractError};
use super::ledger::{LedgerSession, MindQuestLedger};
use super::types::{Address, ChainId, PersonalityRecord, TokenId, TxReceipt, TxStatus};

/// Default address of the deployed personality contract.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x5F60dB550B7736C4C85F9151BA69Ee4320c71Ed4";

/// The contract's ABI surface as seen by the gateway.
///
/// `mint_personality_nft` resolves once the transaction is included.
#[async_trait]
pub trait PersonalityContract: Send + Sync {
    fn address(&self) -> Address;

    async fn mint_personality_nft(
        &self,
        from: Address,
        traits: &TraitVector,
        story: &str,
        personality_type: &str,
    ) -> Result<TxReceipt, ChainError>;

    async fn total_minted(&self) -> Result<u64, ChainError>;

    async fn personality_data(&self, token_id: TokenId) -> Result<PersonalityRecord, ChainError>;

    async fn token_traits(&self, token_id: TokenId) -> Result<TraitVector, ChainError>;

    async fn token_uri(&self, token_id: TokenId) -> Result<String, ChainError>;
}

// ---------------------------------------------------------------------------
// LocalChain
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ChainState {
    ledger: MindQuestLedger,
    block_number: u64,
}

/// A single-contract chain living in process memory.
///
/// Every state-changing call is mined into its own block. Cloning shares the
/// same chain.
#[derive(Debug, Clone)]
pub struct LocalChain {
    chain_id: ChainId,
    address: Address,
    state: Arc<Mutex<ChainState>>,
}

impl LocalChain {
    pub fn new(chain_id: ChainId, address: Address, deployer: Address) -> Self {
        Self::with_ledger(chain_id, address, MindQuestLedger::new(deployer))
    }

    pub fn with_ledger(chain_id: ChainId, address: Address, ledger: MindQuestLedger) -> Self {
        Self {
            chain_id,
            address,
            state: Arc::new(Mutex::new(ChainState {
                ledger,
                block_number: 0,
            })),
        }
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn block_number(&self) -> u64 {
        self.state.lock().block_number
    }

    /// Run `f` against the ledger and mine the result into a block.
    ///
    /// On a contract error nothing is mined and queued logs are discarded.
    fn transact<T>(
        &self,
        from: Address,
        call: &str,
        payload: &str,
        f: impl FnOnce(&mut MindQuestLedger, u64) -> Result<T, ContractError>,
    ) -> Result<(T, TxReceipt), ChainError> {
        let mut state = self.state.lock();
        let timestamp = chrono::Utc::now().timestamp().max(0) as u64;

        let value = match f(&mut state.ledger, timestamp) {
            Ok(value) => value,
            Err(e) => {
                state.ledger.drain_logs();
                log::debug!("local chain: {} from {} reverted: {}", call, from, e);
                return Err(ChainError::Contract(e));
            }
        };

        state.block_number += 1;
        let block_number = state.block_number;
        let logs = state.ledger.drain_logs();
        let tx_hash = tx_hash(from, block_number, call, payload);
        log::debug!(
            "local chain: mined {} in block {} ({} logs)",
            call,
            block_number,
            logs.len()
        );

        Ok((
            value,
            TxReceipt {
                tx_hash,
                block_number,
                from,
                status: TxStatus::Success,
                logs,
            },
        ))
    }

    // -----------------------------------------------------------------------
    // Multi-step session entry points
    // -----------------------------------------------------------------------

    pub fn start_session(&self, from: Address) -> Result<(u64, TxReceipt), ChainError> {
        self.transact(from, "startSession", "", |ledger, _| Ok(ledger.start_session(from)))
    }

    pub fn submit_response(
        &self,
        from: Address,
        session_id: u64,
        question_id: u32,
        option_index: usize,
    ) -> Result<(TraitVector, TxReceipt), ChainError> {
        let payload = format!("{}:{}:{}", session_id, question_id, option_index);
        self.transact(from, "submitResponse", &payload, |ledger, _| {
            ledger.submit_response(from, session_id, question_id, option_index)
        })
    }

    pub fn complete_session(
        &self,
        from: Address,
        session_id: u64,
        story: &str,
        personality_type: &str,
    ) -> Result<(TokenId, TxReceipt), ChainError> {
        let payload = format!("{}:{}:{}", session_id, story, personality_type);
        self.transact(from, "completeSession", &payload, |ledger, ts| {
            ledger.complete_session(from, session_id, story, personality_type, ts)
        })
    }

    pub fn session(&self, session_id: u64) -> Result<LedgerSession, ChainError> {
        Ok(self.state.lock().ledger.session(session_id)?.clone())
    }

    pub fn owner_of(&self, token_id: TokenId) -> Result<Address, ChainError> {
        Ok(self.state.lock().ledger.owner_of(token_id)?)
    }
}

fn tx_hash(from: Address, block_number: u64, call: &str, payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(from.0);
    hasher.update(block_number.to_be_bytes());
    hasher.update(call.as_bytes());
    hasher.update(payload.as_bytes());
    format!("0x{}", hex::encode(hasher.finalize()))
}

#[async_trait]
impl PersonalityContract for LocalChain {
    fn address(&self) -> Address {
        self.address
    }

    async fn mint_personality_nft(
        &self,
        from: Address,
        traits: &TraitVector,
        story: &str,
        personality_type: &str,
    ) -> Result<TxReceipt, ChainError> {
        let payload = format!("{:?}:{}:{}", traits.as_array(), story, personality_type);
        let traits = *traits;
        let (_, receipt) = self.transact(from, "mintPersonalityNFT", &payload, |ledger, ts| {
            Ok(ledger.mint_personality_nft(from, traits, story, personality_type, ts))
        })?;
        Ok(receipt)
    }

    async fn total_minted(&self) -> Result<u64, ChainError> {
        Ok(self.state.lock().ledger.total_minted())
    }

    async fn personality_data(&self, token_id: TokenId) -> Result<PersonalityRecord, ChainError> {
        Ok(self.state.lock().ledger.personality_data(token_id)?.clone())
    }

    async fn token_traits(&self, token_id: TokenId) -> Result<TraitVector, ChainError> {
        Ok(self.state.lock().ledger.token_traits(token_id)?)
    }

    async fn token_uri(&self, token_id: TokenId) -> Result<String, ChainError> {
        Ok(self.state.lock().ledger.token_uri(token_id)?)
    }
}
