//! Transaction module - enrichment, gas handling, signing and broadcast

mod builder;
mod gas;
mod sender;
mod signer;

pub use builder::{TransactionBuilder, UnsignedTransaction};
pub use gas::{GasEstimator, GasPolicy};
pub use sender::TransactionSender;
pub use signer::TransactionSigner;
