//! Shared types for the gas-accrual workspace.
//!
//! This crate provides foundational helpers used by the core accounting crate,
//! the CLI, and the scenario runner:
//!
//! - [`address`] - EVM address parsing and normalization
//! - [`encoding`] - Hex parsing for storage cells, addresses, and wei amounts
//! - [`env_utils`] - Typed environment variable lookups for configuration overrides

pub mod address;
pub mod encoding;
pub mod env_utils;

pub use address::{address_to_string, normalize_address, parse_address, short_address};
pub use encoding::{parse_address_ctx, parse_hex_bytes, parse_u256};

// The EVM primitive types every crate in the workspace shares.
pub use alloy_primitives::{Address, B256, U256};
