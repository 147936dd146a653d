//! Gas limit and fee resolution with a fixed fallback

use crate::chain::{ChainNode, GasPrice};
use crate::error::SwapResult;
use crate::quote::QuotedTransaction;

use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::U256;
use tracing::{debug, warn};

/// How the gas limit of a payload is decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GasPolicy {
    /// Always ask the node, ignoring any hint in the payload
    Estimate,
    /// Keep a non-zero hint from the payload, estimate otherwise
    PreferHint,
}

/// Gas estimator for quoted transactions
pub struct GasEstimator {
    /// Limit used when the node cannot simulate the transaction
    fallback_gas_limit: U256,
}

impl GasEstimator {
    /// Create a new gas estimator
    pub fn new(fallback_gas_limit: u64) -> Self {
        Self {
            fallback_gas_limit: U256::from(fallback_gas_limit),
        }
    }

    /// Resolve the gas limit for `candidate`. Never fails: an estimation error
    /// yields the fallback limit.
    pub async fn resolve_gas_limit(
        &self,
        node: &dyn ChainNode,
        candidate: &TypedTransaction,
        hint: Option<U256>,
        policy: GasPolicy,
    ) -> U256 {
        if policy == GasPolicy::PreferHint {
            if let Some(hint) = hint.filter(|g| !g.is_zero()) {
                debug!("Using quoted gas limit {}", hint);
                return hint;
            }
        }

        match node.estimate_gas(candidate).await {
            Ok(estimate) if !estimate.is_zero() => {
                debug!("Estimated gas for chain {}: {}", node.chain_id(), estimate);
                estimate
            }
            Ok(_) => {
                warn!("Node returned zero gas estimate, using fallback {}", self.fallback_gas_limit);
                crate::metrics::record_gas_fallback(node.chain_id());
                self.fallback_gas_limit
            }
            Err(e) => {
                warn!(
                    "Gas estimation failed: {}. Using fallback {}",
                    e, self.fallback_gas_limit
                );
                crate::metrics::record_gas_fallback(node.chain_id());
                self.fallback_gas_limit
            }
        }
    }

    /// Fee fields from the payload, or the node's legacy gas price when absent
    pub async fn resolve_fees(
        &self,
        node: &dyn ChainNode,
        quoted: &QuotedTransaction,
    ) -> SwapResult<GasPrice> {
        if let (Some(max_fee_per_gas), Some(max_priority_fee_per_gas)) =
            (quoted.max_fee_per_gas, quoted.max_priority_fee_per_gas)
        {
            return Ok(GasPrice::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            });
        }

        if let Some(price) = quoted.gas_price.filter(|p| !p.is_zero()) {
            return Ok(GasPrice::Legacy(price));
        }

        let price = node.gas_price().await?;
        debug!("Gas price for chain {} from node: {}", node.chain_id(), price);
        Ok(GasPrice::Legacy(price))
    }
}
