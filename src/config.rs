//! Host configuration, read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `PORT` | `8080` |
//! | `GROQ_API_KEY` | unset (fallback stories only) |
//! | `MINDQUEST_GROQ_MODEL` | `llama3-8b-8192` |
//! | `MINDQUEST_GROQ_BASE_URL` | `https://api.groq.com/openai/v1` |
//! | `MINDQUEST_GROQ_TIMEOUT_SECS` | unset |
//! | `MINDQUEST_CHAIN_ID` | `11155111` |
//! | `MINDQUEST_CONTRACT_ADDRESS` | the deployed contract |
//! | `MINDQUEST_PLAYER_ADDRESS` | a development account |
//! | `MINDQUEST_SCORING` | `keyword` |
//! | `MINDQUEST_QUESTIONS` | unset (built-in catalog) |
//! | `MINDQUEST_MINT_ID_POLICY` | `require-event` |
//! | `MINDQUEST_EXPLORER_URL` | `https://sepolia.etherscan.io` |

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::chain::{
    Address, ChainGateway, ChainId, LocalChain, LocalWallet, MintIdPolicy,
    DEFAULT_CONTRACT_ADDRESS, DEFAULT_EXPLORER_URL,
};
use crate::narrative::{NarrativeError, Narrator, NarratorConfig};
use crate::questions::{CatalogError, QuestionBank};
use crate::scoring::ScoringMode;

pub const DEFAULT_PORT: u16 = 8080;

/// Signer used by the host's local wallet.
pub const DEFAULT_PLAYER_ADDRESS: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

/// Deployer of the local contract.
pub const DEFAULT_DEPLOYER_ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Question catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Narrator setup failed: {0}")]
    Narrative(#[from] NarrativeError),
}

#[derive(Debug, Clone)]
pub struct QuestConfig {
    pub port: u16,
    pub narrator: NarratorConfig,
    pub chain_id: ChainId,
    pub contract_address: Address,
    pub player_address: Address,
    pub scoring: ScoringMode,
    pub questions_path: Option<PathBuf>,
    pub mint_id_policy: MintIdPolicy,
    pub explorer_url: String,
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            narrator: NarratorConfig::default(),
            chain_id: ChainId::SEPOLIA,
            contract_address: parse_builtin(DEFAULT_CONTRACT_ADDRESS),
            player_address: parse_builtin(DEFAULT_PLAYER_ADDRESS),
            scoring: ScoringMode::default(),
            questions_path: None,
            mint_id_policy: MintIdPolicy::default(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
        }
    }
}

fn parse_builtin(s: &str) -> Address {
    s.parse().unwrap_or(Address::ZERO)
}

/// Parse `var` with `FromStr` when `lookup` has it.
fn parse_var<T, E>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr<Err = E>,
    E: std::fmt::Display,
{
    match lookup(var).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(value) => value.parse::<T>().map(Some).map_err(|e| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
        None => Ok(None),
    }
}

impl QuestConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset or blank variables keep
    /// their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(port) = parse_var::<u16, _>(&lookup, "PORT")? {
            config.port = port;
        }

        config.narrator.api_key = lookup("GROQ_API_KEY");
        if let Some(model) = parse_var::<String, _>(&lookup, "MINDQUEST_GROQ_MODEL")? {
            config.narrator.model = model;
        }
        if let Some(url) = parse_var::<String, _>(&lookup, "MINDQUEST_GROQ_BASE_URL")? {
            config.narrator.base_url = url;
        }
        if let Some(secs) = parse_var::<f64, _>(&lookup, "MINDQUEST_GROQ_TIMEOUT_SECS")? {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(ConfigError::Invalid {
                    var: "MINDQUEST_GROQ_TIMEOUT_SECS",
                    value: secs.to_string(),
                    reason: "must be a positive number of seconds".to_string(),
                });
            }
            config.narrator.timeout = Some(secs);
        }

        if let Some(id) = parse_var::<u64, _>(&lookup, "MINDQUEST_CHAIN_ID")? {
            config.chain_id = ChainId(id);
        }
        if let Some(address) = parse_var::<Address, _>(&lookup, "MINDQUEST_CONTRACT_ADDRESS")? {
            config.contract_address = address;
        }
        if let Some(address) = parse_var::<Address, _>(&lookup, "MINDQUEST_PLAYER_ADDRESS")? {
            config.player_address = address;
        }
        if let Some(mode) = parse_var::<ScoringMode, _>(&lookup, "MINDQUEST_SCORING")? {
            config.scoring = mode;
        }
        if let Some(path) = parse_var::<PathBuf, _>(&lookup, "MINDQUEST_QUESTIONS")? {
            config.questions_path = Some(path);
        }
        if let Some(policy) = parse_var::<MintIdPolicy, _>(&lookup, "MINDQUEST_MINT_ID_POLICY")? {
            config.mint_id_policy = policy;
        }
        if let Some(url) = parse_var::<String, _>(&lookup, "MINDQUEST_EXPLORER_URL")? {
            config.explorer_url = url;
        }

        Ok(config)
    }

    /// The configured catalog, or the built-in one for the scoring mode.
    pub fn question_bank(&self) -> Result<QuestionBank, ConfigError> {
        match &self.questions_path {
            Some(path) => {
                log::info!("loading questions from {}", path.display());
                Ok(QuestionBank::from_yaml_file(path)?)
            }
            None => Ok(self.scoring.default_bank()),
        }
    }

    pub fn narrator(&self) -> Result<Narrator, ConfigError> {
        Ok(Narrator::from_config(self.narrator.clone())?)
    }

    /// A fresh local chain plus a gateway signing as the player address.
    pub fn local_chain(&self) -> (LocalChain, ChainGateway) {
        let chain = LocalChain::new(
            self.chain_id,
            self.contract_address,
            parse_builtin(DEFAULT_DEPLOYER_ADDRESS),
        );
        let wallet = LocalWallet::new(self.player_address, self.chain_id);
        let gateway = ChainGateway::new(Arc::new(wallet), Arc::new(chain.clone()), self.chain_id)
            .with_policy(self.mint_id_policy)
            .with_explorer_url(self.explorer_url.clone());
        (chain, gateway)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = QuestConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.chain_id, ChainId::SEPOLIA);
        assert_eq!(
            config.contract_address.to_string(),
            "0x5f60db550b7736c4c85f9151ba69ee4320c71ed4"
        );
        assert_eq!(config.scoring, ScoringMode::Keyword);
        assert_eq!(config.mint_id_policy, MintIdPolicy::RequireEvent);
        assert_eq!(config.narrator.model, "llama3-8b-8192");
        assert!(config.narrator.api_key.is_none());
        assert!(!config.player_address.is_zero());
    }

    #[test]
    fn test_overrides() {
        let config = QuestConfig::from_lookup(lookup(&[
            ("PORT", "3000"),
            ("GROQ_API_KEY", "gsk_test"),
            ("MINDQUEST_SCORING", "adjustment"),
            ("MINDQUEST_CHAIN_ID", "31337"),
            ("MINDQUEST_MINT_ID_POLICY", "counter-fallback"),
            ("MINDQUEST_GROQ_TIMEOUT_SECS", "2.5"),
        ]))
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.narrator.usable_api_key(), Some("gsk_test"));
        assert_eq!(config.scoring, ScoringMode::Adjustment);
        assert_eq!(config.chain_id, ChainId(31337));
        assert_eq!(config.mint_id_policy, MintIdPolicy::CounterFallback);
        assert_eq!(config.narrator.timeout, Some(2.5));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let err = QuestConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err =
            QuestConfig::from_lookup(lookup(&[("MINDQUEST_PLAYER_ADDRESS", "0x12")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "MINDQUEST_PLAYER_ADDRESS", .. }));

        assert!(QuestConfig::from_lookup(lookup(&[("MINDQUEST_SCORING", "vibes")])).is_err());
        assert!(QuestConfig::from_lookup(lookup(&[("MINDQUEST_GROQ_TIMEOUT_SECS", "0")])).is_err());
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = QuestConfig::from_lookup(lookup(&[("PORT", "  ")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_question_bank_follows_mode() {
        let mut config = QuestConfig::default();
        config.scoring = ScoringMode::Adjustment;
        let bank = config.question_bank().unwrap();
        assert!(bank.questions()[0].options[0].adjustments.is_some());
    }

    fn catalog_file(count: u32) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "questions:").unwrap();
        for id in 1..=count {
            writeln!(file, "  - id: {id}\n    text: Pick {id}\n    options: [Left, Right]").unwrap();
        }
        file
    }

    #[test]
    fn test_question_bank_from_file() {
        let file = catalog_file(5);
        let config = QuestConfig {
            questions_path: Some(file.path().to_path_buf()),
            ..QuestConfig::default()
        };
        let bank = config.question_bank().unwrap();
        assert_eq!(bank.len(), 5);

        let missing = QuestConfig {
            questions_path: Some(PathBuf::from("/nonexistent/questions.yaml")),
            ..QuestConfig::default()
        };
        assert!(matches!(missing.question_bank(), Err(ConfigError::Catalog(_))));
    }

    #[test]
    fn test_short_catalog_file_rejected() {
        let file = catalog_file(1);
        let config = QuestConfig {
            questions_path: Some(file.path().to_path_buf()),
            ..QuestConfig::default()
        };
        let err = config.question_bank().unwrap_err();
        assert!(matches!(err, ConfigError::Catalog(CatalogError::Validation(_))));
    }

    #[tokio::test]
    async fn test_local_chain_gateway_mints() {
        let config = QuestConfig::default();
        let (chain, gateway) = config.local_chain();
        let id = gateway
            .mint(&crate::traits::TraitVector::default(), "S", "T")
            .await
            .unwrap();
        assert_eq!(chain.owner_of(id).unwrap(), config.player_address);
    }

    #[test]
    fn test_narrator_without_key_is_offline() {
        let narrator = QuestConfig::default().narrator().unwrap();
        assert!(!narrator.has_remote());
    }
}
