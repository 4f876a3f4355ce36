//! Error types for gas accrual accounting.
//!
//! There are two classes of failure:
//!
//! - [`AccrualError`]: recoverable. Malformed input to the slot codec's decode
//!   path. Returned as `Err` and propagated with `?`.
//! - [`InvariantViolation`]: unrecoverable. A protocol-level logic error that
//!   must be structurally impossible (refund beyond usage, a codec field beyond
//!   its byte width, a distribution that overshoots its total). These never
//!   surface as `Err`; they go through [`abort_on_violation`], which logs and
//!   panics so the surrounding state transition is torn down.

use alloy_primitives::{Address, U256};
use gas_accrual_types::short_address;

/// Recoverable errors from the accrual layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccrualError {
    /// A storage cell did not have the fixed cell width.
    InvalidCellLength {
        /// Required width in bytes
        expected: usize,
        /// Width of the input that was provided
        actual: usize,
    },
}

impl std::fmt::Display for AccrualError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccrualError::InvalidCellLength { expected, actual } => write!(
                f,
                "storage slot must contain {} bytes, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for AccrualError {}

/// Invariant violations that abort the surrounding state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A refund larger than the gas charged to the ledger or to the contract.
    RefundExceedsUsage {
        address: Address,
        gas_used: u64,
        allocation: u64,
        amount: u64,
    },

    /// Gas usage no longer fits in a u64 counter.
    GasUsageOverflow {
        address: Address,
        gas_used: u64,
        amount: u64,
    },

    /// A record field does not fit in its slot width.
    FieldOverflow {
        field: &'static str,
        width_bytes: usize,
        value: U256,
    },

    /// Sum of per-contract shares exceeded the net billable gas.
    DistributionOverflow { accounted: u128, remaining: u64 },

    /// A record was updated with a timestamp earlier than its last update.
    TimestampRegression {
        address: Address,
        last_updated: u64,
        timestamp: u64,
    },

    /// A wei amount exceeded 256 bits.
    ValueOverflow { context: &'static str },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvariantViolation::RefundExceedsUsage {
                address,
                gas_used,
                allocation,
                amount,
            } => write!(
                f,
                "refund exceeds gas used: address={}, gasUsed={}, allocation={}, amount={}",
                short_address(address),
                gas_used,
                allocation,
                amount
            ),
            InvariantViolation::GasUsageOverflow {
                address,
                gas_used,
                amount,
            } => write!(
                f,
                "gas usage overflow: address={}, gasUsed={}, amount={}",
                short_address(address),
                gas_used,
                amount
            ),
            InvariantViolation::FieldOverflow {
                field,
                width_bytes,
                value,
            } => write!(
                f,
                "field overflow: {} does not fit in {} bytes (value={})",
                field, width_bytes, value
            ),
            InvariantViolation::DistributionOverflow {
                accounted,
                remaining,
            } => write!(
                f,
                "gas accounting inflation: accounted={}, remaining={}",
                accounted, remaining
            ),
            InvariantViolation::TimestampRegression {
                address,
                last_updated,
                timestamp,
            } => write!(
                f,
                "timestamp regression: address={}, lastUpdated={}, timestamp={}",
                short_address(address),
                last_updated,
                timestamp
            ),
            InvariantViolation::ValueOverflow { context } => {
                write!(f, "value overflow: {} exceeds 256 bits", context)
            }
        }
    }
}

/// Log an invariant violation and abort the current state transition.
///
/// Callers reach this only through a logic error upstream; it never returns.
#[cold]
#[track_caller]
pub fn abort_on_violation(violation: InvariantViolation) -> ! {
    tracing::error!(violation = %violation, "accrual invariant violated, aborting");
    panic!("{}", violation)
}
