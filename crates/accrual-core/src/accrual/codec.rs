//! Fixed-width codec for accrual records.
//!
//! A record is packed into one 32-byte storage cell (see the layout in the
//! [module docs](super)). Encoding a field wider than its slot is an invariant
//! violation: 96 bits of wei is orders of magnitude above total supply, and the
//! accumulator and timestamp widths are sized the same way. Decoding only fails
//! on input of the wrong length.

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

use super::params::{
    ACCRUES_BYTES, BALANCE_BYTES, CELL_BYTES, LAST_UPDATED_BYTES, VALUE_SECONDS_BYTES,
};
use crate::errors::{abort_on_violation, AccrualError, InvariantViolation};

const BALANCE_OFFSET: usize = ACCRUES_BYTES;
const VALUE_SECONDS_OFFSET: usize = BALANCE_OFFSET + BALANCE_BYTES;
const LAST_UPDATED_OFFSET: usize = VALUE_SECONDS_OFFSET + VALUE_SECONDS_BYTES;

/// Durable per-contract accrual state.
///
/// The all-zero record (`Default`) is what an untouched cell decodes to: not
/// opted in, nothing accrued, never updated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualRecord {
    /// Whether the contract receives its proportional share.
    pub accrues: bool,
    /// Claimable wei. Must fit in 96 bits.
    pub balance: U256,
    /// Integral of `balance` over elapsed seconds. Must fit in 120 bits.
    pub value_seconds: U256,
    /// Timestamp of the last accrual, in seconds. Must fit in 32 bits.
    pub last_updated: u64,
}

impl AccrualRecord {
    /// An opted-in record with nothing accrued yet.
    pub fn opted_in() -> Self {
        Self {
            accrues: true,
            ..Self::default()
        }
    }

    /// True for the record an untouched cell decodes to.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Pack `record` into a storage cell.
///
/// # Panics
///
/// Aborts if `balance`, `value_seconds`, or `last_updated` exceeds its width
/// (12, 15 and 4 bytes respectively).
pub fn encode(record: &AccrualRecord) -> B256 {
    let mut cell = [0u8; CELL_BYTES];

    if record.accrues {
        cell[0] = 1;
    }
    write_field(
        &mut cell[BALANCE_OFFSET..VALUE_SECONDS_OFFSET],
        record.balance,
        "balance",
    );
    write_field(
        &mut cell[VALUE_SECONDS_OFFSET..LAST_UPDATED_OFFSET],
        record.value_seconds,
        "value_seconds",
    );
    write_field(
        &mut cell[LAST_UPDATED_OFFSET..],
        U256::from(record.last_updated),
        "last_updated",
    );

    B256::from(cell)
}

/// Unpack a storage cell.
///
/// Any nonzero flag byte reads as opted in.
pub fn decode(bytes: &[u8]) -> Result<AccrualRecord, AccrualError> {
    if bytes.len() != CELL_BYTES {
        return Err(AccrualError::InvalidCellLength {
            expected: CELL_BYTES,
            actual: bytes.len(),
        });
    }

    let mut last_updated = [0u8; LAST_UPDATED_BYTES];
    last_updated.copy_from_slice(&bytes[LAST_UPDATED_OFFSET..]);

    Ok(AccrualRecord {
        accrues: bytes[0] != 0,
        balance: U256::from_be_slice(&bytes[BALANCE_OFFSET..VALUE_SECONDS_OFFSET]),
        value_seconds: U256::from_be_slice(&bytes[VALUE_SECONDS_OFFSET..LAST_UPDATED_OFFSET]),
        last_updated: u32::from_be_bytes(last_updated) as u64,
    })
}

/// Write `value` big-endian into `out`, right-aligned.
fn write_field(out: &mut [u8], value: U256, field: &'static str) {
    let width_bytes = out.len();
    if value.bit_len() > width_bytes * 8 {
        abort_on_violation(InvariantViolation::FieldOverflow {
            field,
            width_bytes,
            value,
        });
    }
    let be: [u8; 32] = value.to_be_bytes();
    out.copy_from_slice(&be[32 - width_bytes..]);
}
