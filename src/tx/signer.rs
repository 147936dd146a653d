//! Local transaction signing
//!
//! The private key supplied with a swap request lives only inside
//! `TransactionSigner` for the duration of that request. The signer sees
//! nothing but the finished `UnsignedTransaction` and hands back raw bytes.

use super::builder::UnsignedTransaction;
use crate::error::{SwapError, SwapResult};

use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, Bytes};
use std::fmt;

pub struct TransactionSigner {
    wallet: LocalWallet,
}

impl TransactionSigner {
    /// Parse a hex private key, with or without `0x`
    pub fn from_private_key(private_key: &str) -> SwapResult<Self> {
        let wallet = private_key
            .trim()
            .parse::<LocalWallet>()
            // The underlying error may echo key material, so it is dropped.
            .map_err(|_| SwapError::Wallet("Invalid private key".to_string()))?;

        Ok(Self { wallet })
    }

    /// Address controlled by the key
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Sign and RLP-encode a transaction, EIP-155 protected for its chain
    pub async fn sign(&self, tx: &UnsignedTransaction) -> SwapResult<Bytes> {
        if tx.from != self.address() {
            return Err(SwapError::Signing(format!(
                "transaction sender {:?} does not match signer {:?}",
                tx.from,
                self.address()
            )));
        }

        let typed = tx.to_typed();
        let wallet = self.wallet.clone().with_chain_id(tx.chain_id);
        let signature = wallet
            .sign_transaction(&typed)
            .await
            .map_err(|e| SwapError::Signing(e.to_string()))?;

        Ok(typed.rlp_signed(&signature))
    }
}

impl fmt::Debug for TransactionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionSigner")
            .field("address", &self.address())
            .field("private_key", &"<redacted>")
            .finish()
    }
}
