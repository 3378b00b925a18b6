//! Chain-level value types: addresses, ids, records, receipts and events.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::traits::TraitVector;

static ADDRESS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").unwrap());

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account address, rendered as lowercase `0x` hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(pub [u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !ADDRESS_PATTERN.is_match(s) {
            return Err(format!("invalid address '{}': expected 0x followed by 40 hex digits", s));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(&s[2..], &mut bytes).map_err(|e| e.to_string())?;
        Ok(Address(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Numeric network identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl ChainId {
    /// The Sepolia public test network.
    pub const SEPOLIA: ChainId = ChainId(11_155_111);

    /// `0x`-prefixed hex form used by wallet RPCs (`0xaa36a7` for Sepolia).
    pub fn to_hex(self) -> String {
        format!("0x{:x}", self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Token identifier. Assigned from 1 upward, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenId(pub u64);

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// What the contract stores per token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityRecord {
    pub player: Address,
    pub traits: TraitVector,
    pub ai_generated_story: String,
    pub personality_type: String,
    /// Block timestamp (unix seconds) of the mint.
    pub timestamp: u64,
}

/// Logs emitted by the personality contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum ContractEvent {
    Transfer {
        from: Address,
        to: Address,
        token_id: TokenId,
    },
    #[serde(rename = "NFTMinted")]
    NftMinted {
        player: Address,
        token_id: TokenId,
        personality_type: String,
        traits: TraitVector,
    },
    SessionStarted {
        session_id: u64,
        player: Address,
    },
    ResponseSubmitted {
        session_id: u64,
        question_id: u32,
        option_index: usize,
    },
    SessionCompleted {
        session_id: u64,
        token_id: TokenId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Reverted,
}

/// The outcome of an included transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub tx_hash: String,
    pub block_number: u64,
    pub from: Address,
    pub status: TxStatus,
    pub logs: Vec<ContractEvent>,
}

impl TxReceipt {
    pub fn succeeded(&self) -> bool {
        self.status == TxStatus::Success
    }

    /// Token id of the first `NFTMinted` log, if any.
    pub fn minted_token_id(&self) -> Option<TokenId> {
        self.logs.iter().find_map(|log| match log {
            ContractEvent::NftMinted { token_id, .. } => Some(*token_id),
            _ => None,
        })
    }
}
