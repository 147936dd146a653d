//! Configuration management for the swap service
//!
//! Loads configuration from TOML files with environment variable substitution,
//! so the 1inch API key and RPC URLs never have to live in the file itself.

use crate::chain::SUPPORTED_CHAIN_IDS;

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub quote: QuoteConfig,
    #[serde(default)]
    pub swap: SwapConfig,
    pub chains: HashMap<String, ChainConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// 1inch API access
#[derive(Clone, Deserialize)]
pub struct QuoteConfig {
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Requests per second allowed by the API plan
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

// The API key stays out of logs.
impl std::fmt::Debug for QuoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("requests_per_second", &self.requests_per_second)
            .field("burst", &self.burst)
            .finish()
    }
}

/// Swap workflow policy, injected into every coordinator
#[derive(Debug, Clone, Deserialize)]
pub struct SwapConfig {
    #[serde(default = "default_true")]
    pub auto_approve: bool,
    /// Approve exactly the swap amount instead of an unlimited allowance
    #[serde(default)]
    pub approve_exact_amount: bool,
    #[serde(default)]
    pub allowance_failure_policy: AllowanceFailurePolicy,
    #[serde(default = "default_fallback_gas_limit")]
    pub fallback_gas_limit: u64,
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            auto_approve: true,
            approve_exact_amount: false,
            allowance_failure_policy: AllowanceFailurePolicy::default(),
            fallback_gas_limit: default_fallback_gas_limit(),
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
        }
    }
}

impl SwapConfig {
    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}

/// What to do when the allowance lookup fails
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceFailurePolicy {
    /// Treat the allowance as zero and go through the approval path
    #[default]
    AssumeZero,
    /// Fail the swap without sending anything
    Abort,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_requests_per_second() -> u32 {
    1
}

fn default_burst() -> u32 {
    1
}

fn default_fallback_gas_limit() -> u64 {
    500_000
}

fn default_confirmation_timeout_secs() -> u64 {
    120
}

fn default_receipt_poll_interval_ms() -> u64 {
    1_000
}

impl Settings {
    /// Load settings from the file named by `SWAPPER_CONFIG`, or `config/default.toml`
    pub fn load() -> Result<Self> {
        let config_path = env::var("SWAPPER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));

        Self::load_from(&config_path)
    }

    /// Load settings from a specific file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::parse(&config_str)
    }

    /// Parse settings from TOML text, substituting `${VAR}` references first
    pub fn parse(config_str: &str) -> Result<Self> {
        let config_str = substitute_env_vars(config_str);

        let settings: Settings =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.quote.api_key.trim().is_empty() {
            anyhow::bail!("quote.api_key is empty - set ONEINCH_API_KEY");
        }
        if self.quote.requests_per_second == 0 {
            anyhow::bail!("quote.requests_per_second must be positive");
        }
        reqwest::Url::parse(&self.quote.base_url)
            .with_context(|| format!("Invalid quote.base_url: {}", self.quote.base_url))?;

        if self.chains.is_empty() {
            anyhow::bail!("At least one chain must be configured");
        }

        for (name, chain) in &self.chains {
            if !SUPPORTED_CHAIN_IDS.contains(&chain.chain_id) {
                anyhow::bail!(
                    "Chain {} has unsupported chain ID {}. Supported chain IDs are: {:?}",
                    name,
                    chain.chain_id,
                    SUPPORTED_CHAIN_IDS
                );
            }
            if chain.rpc_url.is_empty() {
                anyhow::bail!("Chain {} has no RPC URL configured", name);
            }
            reqwest::Url::parse(&chain.rpc_url)
                .with_context(|| format!("Chain {} has an invalid RPC URL", name))?;
        }

        if self.quote.timeout_secs == 0 {
            anyhow::bail!("quote.timeout_secs must be positive");
        }

        if self.swap.fallback_gas_limit == 0 {
            anyhow::bail!("swap.fallback_gas_limit must be positive");
        }
        if self.swap.confirmation_timeout_secs == 0 {
            anyhow::bail!("swap.confirmation_timeout_secs must be positive");
        }
        if self.swap.receipt_poll_interval_ms == 0 {
            anyhow::bail!("swap.receipt_poll_interval_ms must be positive");
        }

        Ok(())
    }
}

lazy_static! {
    static ref ENV_REFERENCE: Regex = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
}

/// Replace `${VAR_NAME}` references; unset variables become empty strings
fn substitute_env_vars(input: &str) -> String {
    ENV_REFERENCE
        .replace_all(input, |caps: &Captures| env::var(&caps[1]).unwrap_or_default())
        .into_owned()
}
