//! Environment variable lookups for configuration overrides.
//!
//! Only the CLI consults the environment; library code takes explicit parameters.
//!
//! # Example
//!
//! ```
//! use gas_accrual_types::env_utils::env_address;
//!
//! // Unset variables are not an error
//! assert_eq!(env_address("GAS_ACCRUAL_DOC_UNSET").unwrap(), None);
//! ```

use alloy_primitives::Address;
use anyhow::{anyhow, Result};

use crate::address::parse_address;

/// Read an address override from the environment.
///
/// A variable that is set but malformed is an error rather than a silent
/// fallback: a mistyped recipient must not route value to the default account
/// unnoticed.
///
/// Returns `Ok(None)` when the variable is unset or empty.
pub fn env_address(key: &str) -> Result<Option<Address>> {
    match std::env::var(key) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => parse_address(&raw)
            .map(Some)
            .ok_or_else(|| anyhow!("{} is not a valid address: '{}'", key, raw)),
        Err(_) => Ok(None),
    }
}
