//! Turns a quoted payload into a fully specified, signable transaction

use super::gas::{GasEstimator, GasPolicy};
use crate::address::parse_address;
use crate::chain::{ChainNode, GasPrice};
use crate::error::{SwapError, SwapResult};
use crate::quote::QuotedTransaction;

use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, Eip1559TransactionRequest, TransactionRequest, U256};
use tracing::{debug, warn};

/// Transaction with every field filled in, ready for the signer
#[derive(Debug, Clone, PartialEq)]
pub struct UnsignedTransaction {
    pub to: Address,
    pub from: Address,
    pub data: Bytes,
    pub value: U256,
    pub gas: U256,
    pub fees: GasPrice,
    pub nonce: U256,
    pub chain_id: u64,
}

impl UnsignedTransaction {
    /// ethers representation, legacy or EIP-1559 depending on the fee fields
    pub fn to_typed(&self) -> TypedTransaction {
        typed_transaction(
            self.to,
            self.from,
            self.data.clone(),
            self.value,
            Some(self.gas),
            &self.fees,
            self.nonce,
            self.chain_id,
        )
    }
}

#[allow(clippy::too_many_arguments)]
fn typed_transaction(
    to: Address,
    from: Address,
    data: Bytes,
    value: U256,
    gas: Option<U256>,
    fees: &GasPrice,
    nonce: U256,
    chain_id: u64,
) -> TypedTransaction {
    match fees {
        GasPrice::Legacy(price) => {
            let mut tx = TransactionRequest::new()
                .to(to)
                .from(from)
                .data(data)
                .value(value)
                .gas_price(*price)
                .nonce(nonce)
                .chain_id(chain_id);
            if let Some(gas) = gas {
                tx = tx.gas(gas);
            }
            TypedTransaction::Legacy(tx)
        }
        GasPrice::Eip1559 {
            max_fee_per_gas,
            max_priority_fee_per_gas,
        } => {
            let mut tx = Eip1559TransactionRequest::new()
                .to(to)
                .from(from)
                .data(data)
                .value(value)
                .max_fee_per_gas(*max_fee_per_gas)
                .max_priority_fee_per_gas(*max_priority_fee_per_gas)
                .nonce(nonce)
                .chain_id(chain_id);
            if let Some(gas) = gas {
                tx = tx.gas(gas);
            }
            TypedTransaction::Eip1559(tx)
        }
    }
}

/// Decode `0x`-prefixed calldata
pub fn parse_calldata(input: &str) -> SwapResult<Bytes> {
    let digits = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(digits)
        .map(Bytes::from)
        .map_err(|e| SwapError::MalformedPayload(format!("invalid calldata: {}", e)))
}

/// Enriches quoted payloads with the account-specific fields for one wallet
pub struct TransactionBuilder {
    wallet: Address,
    chain_id: u64,
    gas_estimator: GasEstimator,
}

impl TransactionBuilder {
    pub fn new(wallet: Address, chain_id: u64, gas_estimator: GasEstimator) -> Self {
        Self {
            wallet,
            chain_id,
            gas_estimator,
        }
    }

    /// Fill in `from`, nonce, chain ID, value, fees and gas.
    ///
    /// Fails when the payload has no target or calldata, or when the node cannot
    /// report the nonce; gas estimation failures fall back instead.
    pub async fn build(
        &self,
        node: &dyn ChainNode,
        quoted: &QuotedTransaction,
        gas_policy: GasPolicy,
    ) -> SwapResult<UnsignedTransaction> {
        let to = quoted
            .to
            .as_deref()
            .ok_or_else(|| SwapError::MalformedPayload("payload has no `to` address".to_string()))
            .and_then(parse_address)?;
        let data = quoted
            .data
            .as_deref()
            .ok_or_else(|| SwapError::MalformedPayload("payload has no calldata".to_string()))
            .and_then(parse_calldata)?;

        if let Some(quoted_from) = quoted.from.as_deref() {
            if parse_address(quoted_from).ok() != Some(self.wallet) {
                warn!(
                    "Quoted sender {} differs from wallet {:?}, overriding",
                    quoted_from, self.wallet
                );
            }
        }

        let value = quoted.value.unwrap_or_default();
        let nonce = node.transaction_count(self.wallet).await?;
        let fees = self.gas_estimator.resolve_fees(node, quoted).await?;

        let candidate = typed_transaction(
            to,
            self.wallet,
            data.clone(),
            value,
            None,
            &fees,
            nonce,
            self.chain_id,
        );
        let gas = self
            .gas_estimator
            .resolve_gas_limit(node, &candidate, quoted.gas, gas_policy)
            .await;

        let max_cost = fees.max_cost(gas).ok_or_else(|| {
            SwapError::MalformedPayload(format!("fees {:?} with gas limit {} overflow", fees, gas))
        })?;
        debug!(
            "Built transaction to {:?}: nonce {}, gas {}, max cost {} wei",
            to, nonce, gas, max_cost
        );

        Ok(UnsignedTransaction {
            to,
            from: self.wallet,
            data,
            value,
            gas,
            fees,
            nonce,
            chain_id: self.chain_id,
        })
    }
}
