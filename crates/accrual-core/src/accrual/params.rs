//! Accrual parameters and slot layout constants.
//!
//! [`AccrualParameters`] names the two protocol accounts the distributor touches.
//! They are always passed in explicitly.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

// =============================================================================
// Slot Layout
// =============================================================================

/// Domain string appended to a contract address before hashing its slot key.
pub const SLOT_DOMAIN: &str = "parameters";

/// Width of one storage cell.
pub const CELL_BYTES: usize = 32;

/// Width of the opt-in flag.
pub const ACCRUES_BYTES: usize = 1;

/// Width of the claimable balance (96 bits).
pub const BALANCE_BYTES: usize = 12;

/// Width of the time-weighted accumulator (120 bits).
pub const VALUE_SECONDS_BYTES: usize = 15;

/// Width of the last-update timestamp (32 bits).
pub const LAST_UPDATED_BYTES: usize = 4;

const _: () = assert!(
    ACCRUES_BYTES + BALANCE_BYTES + VALUE_SECONDS_BYTES + LAST_UPDATED_BYTES == CELL_BYTES
);

// =============================================================================
// Protocol Accounts
// =============================================================================

/// Default system account: holds accrual records and the claims escrow balance.
pub const DEFAULT_SYSTEM_ADDRESS: Address = address!("4300000000000000000000000000000000000001");

/// Default recipient of value not claimed by an opted-in contract.
pub const DEFAULT_RECIPIENT_ADDRESS: Address =
    address!("4300000000000000000000000000000000000003");

/// Accounts used by the distributor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualParameters {
    /// Storage namespace of accrual records; also credited as the claims escrow.
    pub system_address: Address,
    /// Credited with unregistered, opted-out, and rounding-remainder shares.
    pub default_recipient: Address,
}

impl Default for AccrualParameters {
    fn default() -> Self {
        Self {
            system_address: DEFAULT_SYSTEM_ADDRESS,
            default_recipient: DEFAULT_RECIPIENT_ADDRESS,
        }
    }
}

impl AccrualParameters {
    pub fn new(system_address: Address, default_recipient: Address) -> Self {
        Self {
            system_address,
            default_recipient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accounts_are_distinct() {
        let params = AccrualParameters::default();
        assert_ne!(params.system_address, params.default_recipient);
        assert_eq!(params.system_address.as_slice()[0], 0x43);
        assert_eq!(params.system_address.as_slice()[19], 0x01);
    }
}
