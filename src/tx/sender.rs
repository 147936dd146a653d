//! Signs and broadcasts a single transaction. No retries: a failed broadcast is
//! reported to the caller as-is.

use super::builder::UnsignedTransaction;
use super::signer::TransactionSigner;
use crate::chain::ChainNode;
use crate::error::SwapResult;

use ethers::types::H256;
use ethers::utils::keccak256;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Broadcasts signed transactions to one chain
pub struct TransactionSender {
    node: Arc<dyn ChainNode>,
}

impl TransactionSender {
    pub fn new(node: Arc<dyn ChainNode>) -> Self {
        Self { node }
    }

    /// Sign locally and send the raw transaction.
    ///
    /// Returns the keccak hash of the signed bytes, which identifies the
    /// transaction on chain regardless of what the node echoes back.
    pub async fn sign_and_send(
        &self,
        signer: &TransactionSigner,
        tx: &UnsignedTransaction,
    ) -> SwapResult<H256> {
        let chain_id = self.node.chain_id();
        let raw = signer.sign(tx).await?;
        let local_hash = H256::from(keccak256(&raw));

        match self.node.send_raw_transaction(raw).await {
            Ok(reported) => {
                if reported != local_hash {
                    warn!(
                        "Node reported hash {:?} for transaction {:?} on chain {}",
                        reported, local_hash, chain_id
                    );
                }
                info!(
                    "Transaction sent: {:?} (nonce {}, gas {}) on chain {}",
                    local_hash, tx.nonce, tx.gas, chain_id
                );
                crate::metrics::record_tx_submitted(chain_id);
                Ok(local_hash)
            }
            Err(e) => {
                error!("Failed to send transaction on chain {}: {}", chain_id, e);
                crate::metrics::record_tx_failed(chain_id);
                Err(e)
            }
        }
    }
}
