//! HTTP JSON-RPC provider for a single chain

use super::ChainNode;
use crate::config::ChainConfig;
use crate::error::{SwapError, SwapResult};

use async_trait::async_trait;
use ethers::prelude::*;
use ethers::providers::{Http, Provider};
use ethers::types::transaction::eip2718::TypedTransaction;
use std::time::Duration;
use tracing::{debug, error};

/// ethers HTTP provider bound to one configured chain
pub struct ChainProvider {
    /// Chain configuration
    config: ChainConfig,
    /// HTTP provider
    http: Provider<Http>,
}

impl ChainProvider {
    /// Create a new chain provider. No request is made until the first call.
    pub fn new(config: ChainConfig) -> SwapResult<Self> {
        let http = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| SwapError::ChainConnection {
                chain_id: config.chain_id,
                message: format!("Invalid RPC URL: {}", e),
            })?
            .interval(Duration::from_millis(500));

        debug!("Added HTTP provider for chain {}", config.chain_id);

        Ok(Self { config, http })
    }

    /// Chain name from configuration
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Health check
    pub async fn health_check(&self) -> bool {
        match self.http.get_block_number().await {
            Ok(_) => true,
            Err(e) => {
                error!("Health check failed for chain {}: {}", self.config.chain_id, e);
                false
            }
        }
    }

    fn connection_error(&self, e: impl std::fmt::Display) -> SwapError {
        SwapError::ChainConnection {
            chain_id: self.config.chain_id,
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl ChainNode for ChainProvider {
    fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    async fn transaction_count(&self, address: Address) -> SwapResult<U256> {
        self.http
            .get_transaction_count(address, Some(BlockNumber::Pending.into()))
            .await
            .map_err(|e| self.connection_error(e))
    }

    async fn estimate_gas(&self, tx: &TypedTransaction) -> SwapResult<U256> {
        self.http
            .estimate_gas(tx, None)
            .await
            .map_err(|e| SwapError::GasEstimation(e.to_string()))
    }

    async fn gas_price(&self) -> SwapResult<U256> {
        self.http
            .get_gas_price()
            .await
            .map_err(|e| SwapError::GasEstimation(e.to_string()))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> SwapResult<H256> {
        let pending = self.http.send_raw_transaction(raw).await.map_err(|e| {
            let message = e.to_string();
            if message.contains("insufficient funds") {
                SwapError::InsufficientFunds {
                    chain_id: self.config.chain_id,
                }
            } else {
                SwapError::Broadcast {
                    chain_id: self.config.chain_id,
                    message,
                }
            }
        })?;

        Ok(pending.tx_hash())
    }

    async fn transaction_receipt(&self, tx_hash: H256) -> SwapResult<Option<TransactionReceipt>> {
        self.http
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| self.connection_error(e))
    }
}

/// Fee fields of a transaction
#[derive(Debug, Clone, PartialEq)]
pub enum GasPrice {
    Legacy(U256),
    Eip1559 {
        max_fee_per_gas: U256,
        max_priority_fee_per_gas: U256,
    },
}

impl GasPrice {
    /// Worst-case cost in wei for a gas limit, `None` if it does not fit in 256 bits
    pub fn max_cost(&self, gas_limit: U256) -> Option<U256> {
        match self {
            GasPrice::Legacy(price) => gas_limit.checked_mul(*price),
            GasPrice::Eip1559 { max_fee_per_gas, .. } => gas_limit.checked_mul(*max_fee_per_gas),
        }
    }
}
