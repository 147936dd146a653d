//! Chain module - JSON-RPC access to the supported EVM networks
//!
//! This module provides:
//! - The `ChainNode` seam the swap workflow talks to
//! - A fixed, read-only registry of chain ID to RPC provider
//! - Receipt polling for transactions that must be mined before continuing

pub mod confirmation;
pub mod provider;

pub use confirmation::wait_for_receipt;
pub use provider::{ChainProvider, GasPrice};

use crate::config::Settings;
use crate::error::{SwapError, SwapResult};

use async_trait::async_trait;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionReceipt, H256, U256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Ethereum, Optimism, Base and Arbitrum One
pub const SUPPORTED_CHAIN_IDS: [u64; 4] = [1, 10, 8453, 42161];

/// Operations the swap workflow needs from a chain node
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChainNode: Send + Sync {
    fn chain_id(&self) -> u64;

    /// Transaction count for `address`, including pending transactions
    async fn transaction_count(&self, address: Address) -> SwapResult<U256>;

    /// Simulate a transaction and return its gas usage
    async fn estimate_gas(&self, tx: &TypedTransaction) -> SwapResult<U256>;

    async fn gas_price(&self) -> SwapResult<U256>;

    /// Broadcast a signed, RLP-encoded transaction
    async fn send_raw_transaction(&self, raw: Bytes) -> SwapResult<H256>;

    async fn transaction_receipt(&self, tx_hash: H256) -> SwapResult<Option<TransactionReceipt>>;
}

/// Fixed chain ID to provider table, built once at startup
pub struct ChainRegistry {
    providers: HashMap<u64, Arc<ChainProvider>>,
}

impl ChainRegistry {
    /// Create providers for every configured chain
    pub fn new(settings: &Settings) -> SwapResult<Self> {
        let mut providers = HashMap::new();

        for chain_config in settings.chains.values() {
            if !SUPPORTED_CHAIN_IDS.contains(&chain_config.chain_id) {
                return Err(SwapError::UnsupportedChain {
                    chain_id: chain_config.chain_id,
                    supported: SUPPORTED_CHAIN_IDS.to_vec(),
                });
            }

            info!(
                "Initializing chain {} (ID: {})",
                chain_config.name, chain_config.chain_id
            );

            let provider = ChainProvider::new(chain_config.clone())?;
            providers.insert(chain_config.chain_id, Arc::new(provider));
        }

        Ok(Self { providers })
    }

    /// Resolve the node for a chain ID; never touches the network
    pub fn resolve(&self, chain_id: u64) -> SwapResult<Arc<dyn ChainNode>> {
        self.providers
            .get(&chain_id)
            .map(|p| p.clone() as Arc<dyn ChainNode>)
            .ok_or_else(|| SwapError::UnsupportedChain {
                chain_id,
                supported: self.configured_chains(),
            })
    }

    /// Configured chain IDs, ascending
    pub fn configured_chains(&self) -> Vec<u64> {
        let mut chains: Vec<u64> = self.providers.keys().copied().collect();
        chains.sort_unstable();
        chains
    }

    /// Chain ID and configured name, ascending by ID
    pub fn chain_names(&self) -> Vec<(u64, String)> {
        self.configured_chains()
            .into_iter()
            .filter_map(|id| self.providers.get(&id).map(|p| (id, p.name().to_string())))
            .collect()
    }

    /// Health check for all chains
    pub async fn health_check(&self) -> Vec<(u64, bool)> {
        let mut results = Vec::new();

        for chain_id in self.configured_chains() {
            if let Some(provider) = self.providers.get(&chain_id) {
                let healthy = provider.health_check().await;
                crate::metrics::record_chain_health(chain_id, healthy);
                results.push((chain_id, healthy));
            }
        }

        results
    }
}
