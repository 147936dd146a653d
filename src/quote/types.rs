//! Payloads returned by the 1inch swap API

use crate::error::{SwapError, SwapResult};

use ethers::types::U256;
use serde::{Deserialize, Deserializer};

/// Transaction payload from `/approve/transaction` or the `tx` field of `/swap`
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuotedTransaction {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub value: Option<U256>,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub gas: Option<U256>,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub gas_price: Option<U256>,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub max_fee_per_gas: Option<U256>,
    #[serde(default, deserialize_with = "deserialize_quantity")]
    pub max_priority_fee_per_gas: Option<U256>,
}

/// Response of `/swap`
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    #[serde(default)]
    pub dst_amount: Option<String>,
    pub tx: QuotedTransaction,
}

/// Response of `/approve/allowance`
#[derive(Debug, Clone, Deserialize)]
pub struct AllowanceResponse {
    pub allowance: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Number(u64),
    Text(String),
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<Option<U256>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawQuantity>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawQuantity::Number(n)) => Ok(Some(U256::from(n))),
        Some(RawQuantity::Text(s)) => parse_quantity(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

/// Parse a quantity given either as `0x`-prefixed hex or as a decimal string
pub fn parse_quantity(input: &str) -> SwapResult<U256> {
    let trimmed = input.trim();

    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some("") => Ok(U256::zero()),
        Some(hex_digits) => U256::from_str_radix(hex_digits, 16).map_err(|e| e.to_string()),
        None if trimmed.is_empty() => Err("empty quantity".to_string()),
        None => U256::from_dec_str(trimmed).map_err(|e| e.to_string()),
    };

    parsed.map_err(|e| SwapError::MalformedPayload(format!("invalid quantity {:?}: {}", input, e)))
}
