//! Read-modify-write access to accrual records.
//!
//! Records live at [`contract_slot`] inside the system account's storage. There
//! is no explicit creation call: a contract that was never written reads back as
//! the all-zero record, and [`AccrualStore::read_existing`] tells the two cases
//! apart.

use alloy_primitives::{Address, B256, U256};
use gas_accrual_types::short_address;

use super::codec::{decode, encode, AccrualRecord};
use super::slot::contract_slot;
use crate::errors::{abort_on_violation, AccrualError, InvariantViolation};
use crate::state::StateDb;

/// Accrual records stored in one system account's namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualStore {
    system_address: Address,
}

impl AccrualStore {
    pub fn new(system_address: Address) -> Self {
        Self { system_address }
    }

    /// Account whose storage holds the records.
    pub fn system_address(&self) -> &Address {
        &self.system_address
    }

    /// The stored record, or `None` if the cell was never written.
    pub fn read_existing<S: StateDb>(
        &self,
        state: &S,
        address: &Address,
    ) -> Result<Option<AccrualRecord>, AccrualError> {
        let cell = state.get_state(&self.system_address, &contract_slot(address));
        if cell == B256::ZERO {
            return Ok(None);
        }
        decode(cell.as_slice()).map(Some)
    }

    /// The stored record, with unseen contracts reading as the zero record.
    pub fn read<S: StateDb>(
        &self,
        state: &S,
        address: &Address,
    ) -> Result<AccrualRecord, AccrualError> {
        Ok(self.read_existing(state, address)?.unwrap_or_default())
    }

    /// Persist `record` for `address`.
    ///
    /// # Panics
    ///
    /// Aborts if a field exceeds its cell width.
    pub fn write<S: StateDb>(&self, state: &mut S, address: &Address, record: &AccrualRecord) {
        let cell = encode(record);
        state.set_state(&self.system_address, contract_slot(address), cell);

        tracing::debug!(
            address = %short_address(address),
            accrues = record.accrues,
            balance = %record.balance,
            value_seconds = %record.value_seconds,
            last_updated = record.last_updated,
            "store: wrote accrual record"
        );
    }

    /// Credit `added_value` to `address` at `timestamp`.
    ///
    /// The time integral is advanced with the balance held before this credit:
    /// `value_seconds += balance * (timestamp - last_updated)`.
    ///
    /// # Panics
    ///
    /// Aborts if `timestamp` is earlier than the record's `last_updated`, or if
    /// the updated record no longer fits its cell.
    pub fn accrue<S: StateDb>(
        &self,
        state: &mut S,
        address: &Address,
        added_value: U256,
        timestamp: u64,
    ) -> Result<AccrualRecord, AccrualError> {
        let mut record = self.read(&*state, address)?;

        let Some(elapsed) = timestamp.checked_sub(record.last_updated) else {
            abort_on_violation(InvariantViolation::TimestampRegression {
                address: *address,
                last_updated: record.last_updated,
                timestamp,
            });
        };

        let Some(value_seconds) = record
            .balance
            .checked_mul(U256::from(elapsed))
            .and_then(|held| record.value_seconds.checked_add(held))
        else {
            abort_on_violation(InvariantViolation::ValueOverflow {
                context: "value_seconds",
            });
        };
        let Some(balance) = record.balance.checked_add(added_value) else {
            abort_on_violation(InvariantViolation::ValueOverflow { context: "balance" });
        };

        record.value_seconds = value_seconds;
        record.balance = balance;
        record.last_updated = timestamp;
        self.write(state, address, &record);

        Ok(record)
    }

    /// Set the opt-in flag for `address`, leaving its counters untouched.
    pub fn set_accrues<S: StateDb>(
        &self,
        state: &mut S,
        address: &Address,
        accrues: bool,
    ) -> Result<AccrualRecord, AccrualError> {
        let mut record = self.read(&*state, address)?;
        record.accrues = accrues;
        self.write(state, address, &record);
        Ok(record)
    }
}
