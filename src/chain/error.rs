//! Chain gateway and contract errors.

use thiserror::Error;

use super::types::{ChainId, TokenId};

/// Conditions the personality contract reverts with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("Token does not exist: {0}")]
    UnknownToken(TokenId),

    #[error("Session does not exist: {0}")]
    UnknownSession(u64),

    #[error("Not your session")]
    NotYourSession,

    #[error("Session already completed")]
    SessionCompleted,

    #[error("Need at least {need} responses")]
    NeedMoreResponses { have: usize, need: usize },

    #[error("Invalid response")]
    InvalidResponse,
}

/// Everything that can go wrong between a finished session and a token id.
#[derive(Debug, Error)]
pub enum ChainError {
    /// No signing identity is available.
    #[error("Please connect your wallet first")]
    NotConnected,

    /// The wallet is on, or could not be moved to, the wrong network.
    #[error("Wrong network: expected chain {expected}, {detail}")]
    WrongNetwork { expected: ChainId, detail: String },

    /// The transaction was included but reverted.
    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    /// The receipt carried no `NFTMinted` event.
    #[error("Transaction {tx_hash} confirmed but no NFTMinted event was found")]
    MissingMintEvent { tx_hash: String },

    /// The contract rejected the call.
    #[error("Execution reverted: {0}")]
    Contract(#[from] ContractError),

    /// Transport or node failure.
    #[error("RPC error: {0}")]
    Rpc(String),
}
