//! Quote module - the 1inch aggregation API as seen by the swap workflow

mod client;
mod rate_limit;
mod types;

pub use client::OneInchClient;
pub use rate_limit::QuoteRateLimiter;
pub use types::{QuotedTransaction, SwapQuote};

use crate::error::SwapResult;

use async_trait::async_trait;
use ethers::types::{Address, U256};

/// Parameters of a `/swap` request
#[derive(Debug, Clone, PartialEq)]
pub struct SwapQuery {
    pub src: Address,
    pub dst: Address,
    pub amount: U256,
    pub from: Address,
    /// Percent, e.g. 1.0 for 1%
    pub slippage: f64,
}

/// Read operations the swap workflow needs from the quoting service
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteService: Send + Sync {
    /// Allowance `wallet` has granted the 1inch router for `token`
    async fn allowance(&self, chain_id: u64, token: Address, wallet: Address) -> SwapResult<U256>;

    /// Approval payload; `None` approves an unlimited amount
    async fn approve_transaction(
        &self,
        chain_id: u64,
        token: Address,
        amount: Option<U256>,
    ) -> SwapResult<QuotedTransaction>;

    async fn swap_transaction(&self, chain_id: u64, query: &SwapQuery) -> SwapResult<SwapQuote>;
}
