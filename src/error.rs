//! Error types for the swap service

use thiserror::Error;

/// Main error type for the swap service
#[derive(Error, Debug)]
pub enum SwapError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported chain ID: {chain_id}. Supported chain IDs are: {supported:?}")]
    UnsupportedChain { chain_id: u64, supported: Vec<u64> },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Wallet error: {0}")]
    Wallet(String),

    #[error("Quote service error on {endpoint}: {message}")]
    QuoteService { endpoint: String, message: String },

    #[error("Rate limited by quote service on {endpoint}")]
    RateLimited { endpoint: String },

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Chain connection error for chain {chain_id}: {message}")]
    ChainConnection { chain_id: u64, message: String },

    #[error("Gas estimation error: {0}")]
    GasEstimation(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Broadcast error for chain {chain_id}: {message}")]
    Broadcast { chain_id: u64, message: String },

    #[error("Insufficient funds on chain {chain_id} to cover gas and value")]
    InsufficientFunds { chain_id: u64 },

    #[error("Timeout waiting for {operation}")]
    Timeout { operation: String },

    #[error("Transaction {tx_hash} reverted on chain {chain_id}")]
    Reverted { chain_id: u64, tx_hash: String },
}

impl SwapError {
    /// Errors raised before the workflow starts; these surface as a service error
    /// instead of a failed outcome.
    pub fn is_setup_error(&self) -> bool {
        matches!(
            self,
            SwapError::Config(_)
                | SwapError::UnsupportedChain { .. }
                | SwapError::InvalidAddress(_)
                | SwapError::InvalidAmount(_)
                | SwapError::Wallet(_)
        )
    }

    /// Check if error came from a collaborator being temporarily unavailable
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            SwapError::QuoteService { .. }
                | SwapError::RateLimited { .. }
                | SwapError::ChainConnection { .. }
                | SwapError::Timeout { .. }
        )
    }
}

/// Result type for swap operations
pub type SwapResult<T> = Result<T, SwapError>;
