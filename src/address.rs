//! EIP-55 address canonicalization
//!
//! The 1inch API and the signer both reject addresses whose checksum casing is
//! wrong, so every address is routed through here before it leaves the process.

use crate::error::{SwapError, SwapResult};

use ethers::types::Address;
use ethers::utils::to_checksum;
use serde_json::Value;
use std::str::FromStr;

/// Parse a `0x`-prefixed hex address, ignoring its casing
pub fn parse_address(input: &str) -> SwapResult<Address> {
    let trimmed = input.trim();
    if trimmed.len() != 42 || !(trimmed.starts_with("0x") || trimmed.starts_with("0X")) {
        return Err(SwapError::InvalidAddress(input.to_string()));
    }

    Address::from_str(&trimmed[2..].to_ascii_lowercase())
        .map_err(|_| SwapError::InvalidAddress(input.to_string()))
}

/// Checksummed textual form of an address
pub fn checksum(address: &Address) -> String {
    to_checksum(address, None)
}

/// Canonicalize a textual address into its checksummed form
pub fn canonicalize(input: &str) -> SwapResult<String> {
    parse_address(input).map(|a| checksum(&a))
}

/// Recursively re-checksum every address-shaped string inside a JSON value.
///
/// Strings that look like addresses but are not valid hex are left alone.
pub fn checksum_json(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, checksum_json(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(checksum_json).collect()),
        Value::String(s) if s.starts_with("0x") && s.len() == 42 => match canonicalize(&s) {
            Ok(canonical) => Value::String(canonical),
            Err(_) => Value::String(s),
        },
        other => other,
    }
}
