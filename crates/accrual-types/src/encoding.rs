//! Parsing utilities for hex bytes, addresses, and wei amounts.
//!
//! Provides shared decoding functions used by the CLI and the scenario runner.
//! These eliminate repetitive error handling patterns.

use std::str::FromStr;

use alloy_primitives::{Address, U256};
use anyhow::{anyhow, Result};

use crate::address::parse_address;

// =============================================================================
// Hex Parsing
// =============================================================================

/// Parse a hex string to raw bytes.
///
/// # Arguments
/// * `hex_str` - Hex string (with or without 0x prefix)
/// * `context` - Description for error messages (e.g., "storage cell")
pub fn parse_hex_bytes(hex_str: &str, context: &str) -> Result<Vec<u8>> {
    let trimmed = hex_str.trim();
    let hex_str = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(hex_str).map_err(|e| anyhow!("Invalid {} hex '{}': {}", context, hex_str, e))
}

/// Parse an address with a context-aware error message.
///
/// # Examples
///
/// ```
/// use gas_accrual_types::encoding::parse_address_ctx;
///
/// assert!(parse_address_ctx("0x2", "contract").is_ok());
/// assert!(parse_address_ctx("0xzz", "contract").is_err());
/// ```
pub fn parse_address_ctx(addr: &str, context: &str) -> Result<Address> {
    parse_address(addr).ok_or_else(|| anyhow!("Invalid {} address '{}'", context, addr))
}

// =============================================================================
// Amounts
// =============================================================================

/// Parse a wei amount given either in decimal ("1000") or hex ("0x3e8").
pub fn parse_u256(value: &str, context: &str) -> Result<U256> {
    U256::from_str(value.trim()).map_err(|e| anyhow!("Invalid {} '{}': {}", context, value, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_bytes() {
        assert_eq!(parse_hex_bytes("0x0102", "test").unwrap(), vec![1, 2]);
        assert_eq!(parse_hex_bytes("0102", "test").unwrap(), vec![1, 2]);

        let err = parse_hex_bytes("0xzz", "slot key").unwrap_err();
        assert!(err.to_string().contains("slot key"));
    }

    #[test]
    fn test_parse_u256() {
        assert_eq!(parse_u256("1000", "gas price").unwrap(), U256::from(1000u64));
        assert_eq!(parse_u256("0x3e8", "gas price").unwrap(), U256::from(1000u64));
        assert!(parse_u256("-1", "gas price").is_err());
    }
}
