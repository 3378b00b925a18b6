//! Wallet collaborator: signing identity and network selection.

use async_trait::async_trait;
use parking_lot::RwLock;

use super::error::ChainError;
use super::types::{Address, ChainId};

/// Supplies the signer address and controls which network it signs for.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// The connected signer, or [`ChainError::NotConnected`].
    async fn address(&self) -> Result<Address, ChainError>;

    async fn chain_id(&self) -> Result<ChainId, ChainError>;

    /// Ask the wallet to move to `target`. Already being there is a no-op.
    async fn switch_chain(&self, target: ChainId) -> Result<(), ChainError>;
}

/// A wallet with a fixed signer, used by the HTTP host and in tests.
#[derive(Debug)]
pub struct LocalWallet {
    address: Option<Address>,
    chain_id: RwLock<ChainId>,
}

impl LocalWallet {
    pub fn new(address: Address, chain_id: ChainId) -> Self {
        Self {
            address: Some(address),
            chain_id: RwLock::new(chain_id),
        }
    }

    /// A wallet with no account connected.
    pub fn disconnected(chain_id: ChainId) -> Self {
        Self {
            address: None,
            chain_id: RwLock::new(chain_id),
        }
    }

    pub fn current_chain(&self) -> ChainId {
        *self.chain_id.read()
    }
}

#[async_trait]
impl Wallet for LocalWallet {
    async fn address(&self) -> Result<Address, ChainError> {
        self.address.ok_or(ChainError::NotConnected)
    }

    async fn chain_id(&self) -> Result<ChainId, ChainError> {
        Ok(self.current_chain())
    }

    async fn switch_chain(&self, target: ChainId) -> Result<(), ChainError> {
        let mut current = self.chain_id.write();
        if *current != target {
            log::info!("wallet: switching chain {} -> {} ({})", *current, target, target.to_hex());
            *current = target;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_switch_is_idempotent() {
        let wallet = LocalWallet::new(Address::ZERO, ChainId(1));
        wallet.switch_chain(ChainId::SEPOLIA).await.unwrap();
        assert_eq!(wallet.chain_id().await.unwrap(), ChainId::SEPOLIA);
        wallet.switch_chain(ChainId::SEPOLIA).await.unwrap();
        assert_eq!(wallet.current_chain(), ChainId::SEPOLIA);
    }

    #[tokio::test]
    async fn test_disconnected_has_no_address() {
        let wallet = LocalWallet::disconnected(ChainId::SEPOLIA);
        assert!(matches!(wallet.address().await, Err(ChainError::NotConnected)));
    }
}
