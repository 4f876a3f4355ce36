//! Address normalization utilities.
//!
//! This module is the canonical source for address normalization in the workspace.
//! Other crates should import from here rather than defining their own logic.
//!
//! EVM addresses are 20-byte values, but they're often written in different formats:
//! - Short form: "0x1"
//! - Full form: "0x0000000000000000000000000000000000000001"
//! - Without prefix: "1"
//!
//! Storage-slot derivation hashes the canonical 20-byte representation, so every
//! textual form of the same address must resolve to the same [`Address`].

use alloy_primitives::Address;

/// Width of an EVM address in bytes.
pub const ADDRESS_BYTES: usize = 20;

/// Number of hex characters in a full-form address.
const ADDRESS_HEX_LEN: usize = ADDRESS_BYTES * 2;

/// Normalize an address to lowercase with 0x prefix and full 40 hex characters.
///
/// Inputs longer than 40 hex characters are kept as-is (and rejected by
/// [`parse_address`]), so a typo never silently truncates to another address.
///
/// # Examples
///
/// ```
/// use gas_accrual_types::address::normalize_address;
///
/// assert_eq!(
///     normalize_address("0x1"),
///     "0x0000000000000000000000000000000000000001"
/// );
/// assert_eq!(
///     normalize_address("ABC"),
///     "0x0000000000000000000000000000000000000abc"
/// );
/// ```
pub fn normalize_address(addr: &str) -> String {
    let addr = addr.trim();
    let hex = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr)
        .to_lowercase();
    format!("0x{:0>width$}", hex, width = ADDRESS_HEX_LEN)
}

/// Parse a string address into an [`Address`].
///
/// Handles both short ("0x2") and full forms. Returns `None` for non-hex
/// input or input wider than 20 bytes.
///
/// # Examples
///
/// ```
/// use gas_accrual_types::address::parse_address;
///
/// let addr = parse_address("0x2").unwrap();
/// assert_eq!(addr.as_slice()[19], 2);
/// assert!(parse_address("not-hex").is_none());
/// ```
pub fn parse_address(addr: &str) -> Option<Address> {
    let normalized = normalize_address(addr);
    let bytes = hex::decode(&normalized[2..]).ok()?;
    if bytes.len() != ADDRESS_BYTES {
        return None;
    }
    Some(Address::from_slice(&bytes))
}

/// Convert an [`Address`] to its normalized full-form string.
pub fn address_to_string(addr: &Address) -> String {
    format!("0x{}", hex::encode(addr.as_slice()))
}

/// Render an [`Address`] with leading zeros trimmed ("0x1" instead of 40 digits).
///
/// This is useful for log fields and display purposes.
pub fn short_address(addr: &Address) -> String {
    let full = hex::encode(addr.as_slice());
    let trimmed = full.trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{}", trimmed)
    }
}
