//! On-chain side of MindQuest.
//!
//! - [`types`]: addresses, ids, receipts and contract events
//! - [`ledger`]: the personality contract's state machine
//! - [`contract`]: the [`PersonalityContract`] seam and [`LocalChain`]
//! - [`wallet`]: the [`Wallet`] seam and [`LocalWallet`]
//! - [`gateway`]: [`ChainGateway`], which mints a finished profile

pub mod contract;
pub mod error;
pub mod gateway;
pub mod ledger;
pub mod types;
pub mod wallet;

pub use contract::{LocalChain, PersonalityContract, DEFAULT_CONTRACT_ADDRESS};
pub use error::{ChainError, ContractError};
pub use gateway::{ChainGateway, MintIdPolicy, DEFAULT_EXPLORER_URL};
pub use ledger::{LedgerSession, MindQuestLedger, MIN_SESSION_RESPONSES, TOKEN_NAME, TOKEN_SYMBOL};
pub use types::{Address, ChainId, ContractEvent, PersonalityRecord, TokenId, TxReceipt, TxStatus};
pub use wallet::{LocalWallet, Wallet};
