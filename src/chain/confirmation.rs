//! Waiting for a broadcast transaction to be mined

use super::ChainNode;
use crate::error::{SwapError, SwapResult};

use ethers::types::{TransactionReceipt, H256};
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info};

/// Poll the node until `tx_hash` has a receipt.
///
/// A mined receipt with status 0 is reported as `Reverted`; a receipt without a
/// status field (pre-Byzantium) counts as success.
pub async fn wait_for_receipt(
    node: &dyn ChainNode,
    tx_hash: H256,
    poll_interval: Duration,
    max_wait: Duration,
) -> SwapResult<TransactionReceipt> {
    let chain_id = node.chain_id();

    let poll = async {
        // `interval` panics on a zero period.
        let mut ticker = interval(poll_interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if let Some(receipt) = node.transaction_receipt(tx_hash).await? {
                return Ok::<_, SwapError>(receipt);
            }
            debug!("Transaction {:?} not yet mined on chain {}", tx_hash, chain_id);
        }
    };

    let receipt = timeout(max_wait, poll)
        .await
        .map_err(|_| SwapError::Timeout {
            operation: format!("receipt of {:?} on chain {}", tx_hash, chain_id),
        })??;

    if receipt.status == Some(0u64.into()) {
        return Err(SwapError::Reverted {
            chain_id,
            tx_hash: format!("{:?}", tx_hash),
        });
    }

    info!(
        "Transaction {:?} mined on chain {} in block {:?}",
        tx_hash, chain_id, receipt.block_number
    );
    Ok(receipt)
}
