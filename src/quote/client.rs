//! HTTP client for the 1inch swap API v6.0

use super::rate_limit::QuoteRateLimiter;
use super::types::{parse_quantity, AllowanceResponse, QuotedTransaction, SwapQuote};
use super::{QuoteService, SwapQuery};
use crate::address::{checksum, checksum_json};
use crate::config::QuoteConfig;
use crate::error::{SwapError, SwapResult};

use async_trait::async_trait;
use ethers::types::{Address, U256};
use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

const ALLOWANCE_PATH: &str = "/approve/allowance";
const APPROVE_PATH: &str = "/approve/transaction";
const SWAP_PATH: &str = "/swap";

/// 1inch API client; cheap to clone, all clones share one rate limiter
#[derive(Clone)]
pub struct OneInchClient {
    client: Client,
    base_url: String,
    api_key: String,
    rate_limiter: Arc<QuoteRateLimiter>,
}

impl OneInchClient {
    pub fn new(config: &QuoteConfig, rate_limiter: Arc<QuoteRateLimiter>) -> SwapResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("oneinch-swapper/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SwapError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            rate_limiter,
        })
    }

    /// Full URL of an endpoint on a chain
    fn endpoint_url(&self, chain_id: u64, path: &str) -> String {
        format!("{}/swap/v6.0/{}{}", self.base_url, chain_id, path)
    }

    /// Throttled GET returning the address-normalized JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        chain_id: u64,
        path: &str,
        params: &[(&str, String)],
    ) -> SwapResult<T> {
        self.rate_limiter.acquire(path).await;

        let url = self.endpoint_url(chain_id, path);
        debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header(header::ACCEPT, "application/json")
            .query(params)
            .send()
            .await
            .map_err(|e| {
                crate::metrics::record_quote_request(path, "transport_error");
                SwapError::QuoteService {
                    endpoint: path.to_string(),
                    message: e.to_string(),
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            crate::metrics::record_quote_request(path, "rate_limited");
            warn!("Quote service rate limited request to {}", path);
            return Err(SwapError::RateLimited {
                endpoint: path.to_string(),
            });
        }
        if !status.is_success() {
            crate::metrics::record_quote_request(path, "http_error");
            let body = response.text().await.unwrap_or_default();
            return Err(SwapError::QuoteService {
                endpoint: path.to_string(),
                message: format!("{}: {}", status, body),
            });
        }

        let body: Value = response.json().await.map_err(|e| {
            crate::metrics::record_quote_request(path, "decode_error");
            SwapError::MalformedPayload(format!("{} returned invalid JSON: {}", path, e))
        })?;

        crate::metrics::record_quote_request(path, "ok");
        decode_payload(path, body)
    }
}

impl std::fmt::Debug for OneInchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OneInchClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Re-checksum every address in the body, then decode it
fn decode_payload<T: DeserializeOwned>(path: &str, body: Value) -> SwapResult<T> {
    serde_json::from_value(checksum_json(body))
        .map_err(|e| SwapError::MalformedPayload(format!("{} returned unexpected payload: {}", path, e)))
}

fn approve_params(token: Address, amount: Option<U256>) -> Vec<(&'static str, String)> {
    let mut params = vec![("tokenAddress", checksum(&token))];
    if let Some(amount) = amount {
        params.push(("amount", amount.to_string()));
    }
    params
}

fn swap_params(query: &SwapQuery) -> Vec<(&'static str, String)> {
    vec![
        ("src", checksum(&query.src)),
        ("dst", checksum(&query.dst)),
        ("amount", query.amount.to_string()),
        ("from", checksum(&query.from)),
        ("origin", checksum(&query.from)),
        ("slippage", query.slippage.to_string()),
        ("disableEstimate", "false".to_string()),
        ("allowPartialFill", "true".to_string()),
    ]
}

#[async_trait]
impl QuoteService for OneInchClient {
    #[instrument(skip(self))]
    async fn allowance(&self, chain_id: u64, token: Address, wallet: Address) -> SwapResult<U256> {
        let params = [
            ("tokenAddress", checksum(&token)),
            ("walletAddress", checksum(&wallet)),
        ];
        let response: AllowanceResponse = self.get_json(chain_id, ALLOWANCE_PATH, &params).await?;
        parse_quantity(&response.allowance)
    }

    #[instrument(skip(self))]
    async fn approve_transaction(
        &self,
        chain_id: u64,
        token: Address,
        amount: Option<U256>,
    ) -> SwapResult<QuotedTransaction> {
        self.get_json(chain_id, APPROVE_PATH, &approve_params(token, amount))
            .await
    }

    #[instrument(skip(self, query))]
    async fn swap_transaction(&self, chain_id: u64, query: &SwapQuery) -> SwapResult<SwapQuote> {
        self.get_json(chain_id, SWAP_PATH, &swap_params(query)).await
    }
}
