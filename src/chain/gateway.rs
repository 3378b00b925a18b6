//! Chain gateway: turns a finished profile into a minted token.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::traits::TraitVector;

use super::contract::PersonalityContract;
use super::error::ChainError;
use super::types::{ChainId, PersonalityRecord, TokenId};
use super::wallet::Wallet;

pub const DEFAULT_EXPLORER_URL: &str = "https://sepolia.etherscan.io";

/// How to obtain the token id when the receipt lacks an `NFTMinted` log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MintIdPolicy {
    /// Treat the missing event as a failed mint.
    #[default]
    RequireEvent,
    /// Read `getTotalMinted` and use it. Races with concurrent minters.
    CounterFallback,
}

impl FromStr for MintIdPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "require-event" => Ok(MintIdPolicy::RequireEvent),
            "counter-fallback" => Ok(MintIdPolicy::CounterFallback),
            other => Err(format!(
                "unknown mint id policy '{}' (expected 'require-event' or 'counter-fallback')",
                other
            )),
        }
    }
}

/// Wallet + contract + target network.
#[derive(Clone)]
pub struct ChainGateway {
    wallet: Arc<dyn Wallet>,
    contract: Arc<dyn PersonalityContract>,
    target_chain: ChainId,
    policy: MintIdPolicy,
    explorer_url: String,
}

impl fmt::Debug for ChainGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainGateway")
            .field("contract", &self.contract.address())
            .field("target_chain", &self.target_chain)
            .field("policy", &self.policy)
            .finish()
    }
}

impl ChainGateway {
    pub fn new(
        wallet: Arc<dyn Wallet>,
        contract: Arc<dyn PersonalityContract>,
        target_chain: ChainId,
    ) -> Self {
        Self {
            wallet,
            contract,
            target_chain,
            policy: MintIdPolicy::default(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
        }
    }

    pub fn with_policy(mut self, policy: MintIdPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_explorer_url(mut self, url: impl Into<String>) -> Self {
        self.explorer_url = url.into();
        self
    }

    pub fn wallet(&self) -> &Arc<dyn Wallet> {
        &self.wallet
    }

    pub fn target_chain(&self) -> ChainId {
        self.target_chain
    }

    pub fn policy(&self) -> MintIdPolicy {
        self.policy
    }

    /// Mint `traits`, `story` and `personality_type` to the wallet's signer.
    ///
    /// The network switch is issued right before the call and is a no-op if
    /// the wallet is already on the target chain. Nothing is retried.
    pub async fn mint(
        &self,
        traits: &TraitVector,
        story: &str,
        personality_type: &str,
    ) -> Result<TokenId, ChainError> {
        let signer = self.wallet.address().await?;
        self.wallet.switch_chain(self.target_chain).await?;

        let current = self.wallet.chain_id().await?;
        if current != self.target_chain {
            return Err(ChainError::WrongNetwork {
                expected: self.target_chain,
                detail: format!("wallet is on chain {}", current),
            });
        }

        log::info!(
            "minting personality NFT: signer={}, traits=[{}], type={:?}",
            signer,
            traits,
            personality_type
        );
        let receipt = self
            .contract
            .mint_personality_nft(signer, traits, story, personality_type)
            .await?;
        log::info!(
            "mint transaction {} confirmed in block {}",
            receipt.tx_hash,
            receipt.block_number
        );

        if !receipt.succeeded() {
            return Err(ChainError::Reverted {
                tx_hash: receipt.tx_hash,
            });
        }

        if let Some(token_id) = receipt.minted_token_id() {
            log::info!("NFT minted with token id {}", token_id);
            return Ok(token_id);
        }

        match self.policy {
            MintIdPolicy::RequireEvent => Err(ChainError::MissingMintEvent {
                tx_hash: receipt.tx_hash,
            }),
            MintIdPolicy::CounterFallback => {
                let total = self.contract.total_minted().await?;
                log::warn!(
                    "no NFTMinted event in {}; assuming token id {} from total minted",
                    receipt.tx_hash,
                    total
                );
                Ok(TokenId(total))
            }
        }
    }

    pub async fn total_minted(&self) -> Result<u64, ChainError> {
        self.contract.total_minted().await
    }

    pub async fn personality_data(&self, token_id: TokenId) -> Result<PersonalityRecord, ChainError> {
        self.contract.personality_data(token_id).await
    }

    pub async fn token_traits(&self, token_id: TokenId) -> Result<TraitVector, ChainError> {
        self.contract.token_traits(token_id).await
    }

    pub async fn token_uri(&self, token_id: TokenId) -> Result<String, ChainError> {
        self.contract.token_uri(token_id).await
    }

    /// Explorer page for a token of the configured contract.
    pub fn token_link(&self, token_id: TokenId) -> String {
        format!(
            "{}/token/{}?a={}",
            self.explorer_url.trim_end_matches('/'),
            self.contract.address(),
            token_id.0
        )
    }

    pub fn transaction_link(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.explorer_url.trim_end_matches('/'), tx_hash)
    }
}
