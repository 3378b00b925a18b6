//! # MindQuest
//!
//! A five-question personality quest. Each answer moves six trait scores,
//! the finished profile is narrated (remotely through Groq, or from a fixed
//! local story set), and the result can be minted as a personality NFT.
//!
//! - [`traits`]: the clamped six-trait vector
//! - [`questions`]: question catalogs, built-in or loaded from YAML
//! - [`scoring`]: keyword and percentage-adjustment scorers
//! - [`narrative`]: story generation with a deterministic fallback
//! - [`chain`]: contract ledger, wallet and mint gateway
//! - [`session`]: the per-player state machine
//! - [`config`]: environment configuration
//! - [`server`]: the axum HTTP host

pub mod chain;
pub mod config;
pub mod narrative;
pub mod questions;
pub mod scoring;
pub mod server;
pub mod session;
pub mod traits;

pub use chain::{ChainError, ChainGateway, MintIdPolicy, TokenId};
pub use config::{ConfigError, QuestConfig};
pub use narrative::{NarrativeGenerator, Narrator};
pub use questions::{Question, QuestionBank};
pub use scoring::{Scorer, ScoringMode};
pub use session::{QuestSession, SessionError, SessionPhase};
pub use traits::{TraitKind, TraitVector};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
