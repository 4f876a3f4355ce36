//! Storage capability consumed by the accrual layer.
//!
//! The accrual layer never owns world state. It reads and writes 32-byte cells
//! in a system account's storage namespace and credits account balances through
//! the [`StateDb`] trait, which the host (a trie-backed state database) implements.
//!
//! [`InMemoryStateDb`] is a map-backed implementation used by tests, the
//! scenario runner, and hosts that do not need authenticated storage.

use std::collections::HashMap;

use alloy_primitives::{Address, B256, U256};

use crate::errors::{abort_on_violation, InvariantViolation};

/// Read/write access to storage cells and account balances.
///
/// Implementations must serialize all calls made within one state transition;
/// the accrual layer performs no locking of its own.
pub trait StateDb {
    /// Read the cell at `slot` in `account`'s storage. Unwritten cells are zero.
    fn get_state(&self, account: &Address, slot: &B256) -> B256;

    /// Write the cell at `slot` in `account`'s storage.
    fn set_state(&mut self, account: &Address, slot: B256, value: B256);

    /// Current balance of `account` in wei.
    fn get_balance(&self, account: &Address) -> U256;

    /// Credit `amount` wei to `account`.
    fn add_balance(&mut self, account: &Address, amount: U256);
}

impl<S: StateDb + ?Sized> StateDb for &mut S {
    fn get_state(&self, account: &Address, slot: &B256) -> B256 {
        (**self).get_state(account, slot)
    }

    fn set_state(&mut self, account: &Address, slot: B256, value: B256) {
        (**self).set_state(account, slot, value)
    }

    fn get_balance(&self, account: &Address) -> U256 {
        (**self).get_balance(account)
    }

    fn add_balance(&mut self, account: &Address, amount: U256) {
        (**self).add_balance(account, amount)
    }
}

/// In-memory [`StateDb`] backed by hash maps.
///
/// Zero-valued cells are not stored, matching EVM storage semantics where
/// writing zero clears a slot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStateDb {
    storage: HashMap<(Address, B256), B256>,
    balances: HashMap<Address, U256>,
}

impl InMemoryStateDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of non-zero cells across all accounts.
    pub fn slot_count(&self) -> usize {
        self.storage.len()
    }

    /// Non-zero cells of one account, sorted by slot key.
    pub fn slots_of(&self, account: &Address) -> Vec<(B256, B256)> {
        let mut slots: Vec<_> = self
            .storage
            .iter()
            .filter(|((owner, _), _)| owner == account)
            .map(|((_, slot), value)| (*slot, *value))
            .collect();
        slots.sort_by_key(|(slot, _)| *slot);
        slots
    }

    /// Accounts with a non-zero balance, sorted by address.
    pub fn balances(&self) -> Vec<(Address, U256)> {
        let mut balances: Vec<_> = self
            .balances
            .iter()
            .filter(|(_, balance)| !balance.is_zero())
            .map(|(account, balance)| (*account, *balance))
            .collect();
        balances.sort_by_key(|(account, _)| *account);
        balances
    }
}

impl StateDb for InMemoryStateDb {
    fn get_state(&self, account: &Address, slot: &B256) -> B256 {
        self.storage
            .get(&(*account, *slot))
            .copied()
            .unwrap_or(B256::ZERO)
    }

    fn set_state(&mut self, account: &Address, slot: B256, value: B256) {
        if value == B256::ZERO {
            self.storage.remove(&(*account, slot));
        } else {
            self.storage.insert((*account, slot), value);
        }
    }

    fn get_balance(&self, account: &Address) -> U256 {
        self.balances.get(account).copied().unwrap_or(U256::ZERO)
    }

    fn add_balance(&mut self, account: &Address, amount: U256) {
        let balance = self.balances.entry(*account).or_insert(U256::ZERO);
        let Some(credited) = balance.checked_add(amount) else {
            abort_on_violation(InvariantViolation::ValueOverflow {
                context: "account balance",
            });
        };
        *balance = credited;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_cell_reads_zero() {
        let state = InMemoryStateDb::new();
        let account = Address::with_last_byte(1);
        assert_eq!(state.get_state(&account, &B256::ZERO), B256::ZERO);
        assert_eq!(state.get_balance(&account), U256::ZERO);
    }

    #[test]
    fn test_zero_write_clears_cell() {
        let mut state = InMemoryStateDb::new();
        let account = Address::with_last_byte(1);
        let slot = B256::with_last_byte(9);

        state.set_state(&account, slot, B256::with_last_byte(1));
        assert_eq!(state.slot_count(), 1);
        assert_eq!(state.slots_of(&account), vec![(slot, B256::with_last_byte(1))]);

        state.set_state(&account, slot, B256::ZERO);
        assert_eq!(state.slot_count(), 0);
    }

    #[test]
    fn test_cells_are_namespaced_by_account() {
        let mut state = InMemoryStateDb::new();
        let slot = B256::with_last_byte(3);
        state.set_state(&Address::with_last_byte(1), slot, B256::with_last_byte(1));

        assert_eq!(
            state.get_state(&Address::with_last_byte(2), &slot),
            B256::ZERO
        );
    }

    #[test]
    fn test_add_balance_accumulates() {
        let mut state = InMemoryStateDb::new();
        let account = Address::with_last_byte(5);

        state.add_balance(&account, U256::from(3u64));
        state.add_balance(&account, U256::from(4u64));
        state.add_balance(&Address::with_last_byte(6), U256::ZERO);

        assert_eq!(state.get_balance(&account), U256::from(7u64));
        assert_eq!(state.balances(), vec![(account, U256::from(7u64))]);
    }

    #[test]
    #[should_panic(expected = "account balance exceeds 256 bits")]
    fn test_add_balance_overflow_aborts() {
        let mut state = InMemoryStateDb::new();
        let account = Address::with_last_byte(5);

        state.add_balance(&account, U256::MAX);
        state.add_balance(&account, U256::from(1u64));
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn credit<S: StateDb>(mut state: S, account: &Address) {
            state.add_balance(account, U256::from(1u64));
        }

        let mut state = InMemoryStateDb::new();
        let account = Address::with_last_byte(8);
        credit(&mut state, &account);
        assert_eq!(state.get_balance(&account), U256::from(1u64));
    }
}
