//! Per-execution gas attribution.
//!
//! The interpreter charges gas to the contract whose code is running and hands
//! back refunds to the same contract. A [`GasLedger`] is created per transaction
//! or block, mutated only by its owner, and consumed by the distributor at
//! finalization.

use std::collections::HashMap;

use alloy_primitives::Address;
use gas_accrual_types::short_address;

use crate::errors::{abort_on_violation, InvariantViolation};

/// Gas attributed to contracts during one unit of execution.
///
/// `total_used()` always equals the sum of every contract's allocation.
#[derive(Debug, Clone, Default)]
pub struct GasLedger {
    allocations: HashMap<Address, u64>,
    gas_used: u64,
}

impl GasLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute `amount` gas to `address`.
    pub fn use_gas(&mut self, address: Address, amount: u64) {
        let allocation = self.allocations.entry(address).or_insert(0);
        let (Some(gas_used), Some(new_allocation)) = (
            self.gas_used.checked_add(amount),
            allocation.checked_add(amount),
        ) else {
            abort_on_violation(InvariantViolation::GasUsageOverflow {
                address,
                gas_used: self.gas_used,
                amount,
            });
        };
        self.gas_used = gas_used;
        *allocation = new_allocation;

        tracing::trace!(
            address = %short_address(&address),
            amount = amount,
            allocation = new_allocation,
            gas_used = gas_used,
            "ledger: used gas"
        );
    }

    /// Return `amount` previously charged to `address`.
    ///
    /// # Panics
    ///
    /// Aborts when `amount` exceeds the ledger total or the contract's
    /// allocation. Refunding more than was charged is a caller bug.
    pub fn refund_gas(&mut self, address: Address, amount: u64) {
        let allocation = self.used_by(&address);
        if amount > self.gas_used || amount > allocation {
            abort_on_violation(InvariantViolation::RefundExceedsUsage {
                address,
                gas_used: self.gas_used,
                allocation,
                amount,
            });
        }

        self.gas_used -= amount;
        self.allocations.insert(address, allocation - amount);

        tracing::trace!(
            address = %short_address(&address),
            amount = amount,
            allocation = allocation - amount,
            gas_used = self.gas_used,
            "ledger: refunded gas"
        );
    }

    /// Gas currently attributed to `address`.
    pub fn used_by(&self, address: &Address) -> u64 {
        self.allocations.get(address).copied().unwrap_or(0)
    }

    /// Sum of all attributed gas.
    pub fn total_used(&self) -> u64 {
        self.gas_used
    }

    /// Every contract that has been charged, including those refunded to zero.
    pub fn allocations(&self) -> impl Iterator<Item = (&Address, &u64)> {
        self.allocations.iter()
    }

    pub fn len(&self) -> usize {
        self.allocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn addr(n: u8) -> Address {
        Address::with_last_byte(n)
    }

    #[test]
    fn test_new_ledger_is_empty() {
        let ledger = GasLedger::new();
        assert_eq!(ledger.total_used(), 0);
        assert!(ledger.is_empty());
        assert_eq!(ledger.used_by(&addr(1)), 0);
    }

    #[test]
    fn test_use_gas_accumulates_per_address() {
        let mut ledger = GasLedger::new();
        ledger.use_gas(addr(1), 5);
        ledger.use_gas(addr(1), 5);
        ledger.use_gas(addr(2), 3);

        assert_eq!(ledger.total_used(), 13);
        assert_eq!(ledger.used_by(&addr(1)), 10);
        assert_eq!(ledger.used_by(&addr(2)), 3);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_refund_keeps_zeroed_entry() {
        let mut ledger = GasLedger::new();
        ledger.use_gas(addr(1), 5);
        ledger.refund_gas(addr(1), 5);

        assert_eq!(ledger.total_used(), 0);
        assert_eq!(ledger.used_by(&addr(1)), 0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    #[should_panic(expected = "refund exceeds gas used")]
    fn test_refund_more_than_allocation_aborts() {
        let mut ledger = GasLedger::new();
        ledger.use_gas(addr(1), 5);
        ledger.use_gas(addr(2), 10);
        // Ledger total covers it, the contract's allocation does not
        ledger.refund_gas(addr(1), 6);
    }

    #[test]
    #[should_panic(expected = "refund exceeds gas used")]
    fn test_refund_unknown_address_aborts() {
        let mut ledger = GasLedger::new();
        ledger.use_gas(addr(1), 5);
        ledger.refund_gas(addr(2), 1);
    }

    #[test]
    #[should_panic(expected = "gas usage overflow")]
    fn test_use_gas_overflow_aborts() {
        let mut ledger = GasLedger::new();
        ledger.use_gas(addr(1), u64::MAX);
        ledger.use_gas(addr(2), 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Use(u8, u64),
        Refund(u8, u64),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u8..4, 0u64..1_000).prop_map(|(a, n)| Op::Use(a, n)),
            (0u8..4, 0u64..1_000).prop_map(|(a, n)| Op::Refund(a, n)),
        ]
    }

    proptest! {
        #[test]
        fn prop_total_equals_sum_of_allocations(ops in prop::collection::vec(op_strategy(), 0..64)) {
            let mut ledger = GasLedger::new();
            for op in ops {
                match op {
                    Op::Use(a, n) => ledger.use_gas(addr(a), n),
                    Op::Refund(a, n) => {
                        // Clamp so the refund precondition always holds
                        let n = n.min(ledger.used_by(&addr(a)));
                        ledger.refund_gas(addr(a), n);
                    }
                }
                let sum: u64 = ledger.allocations().map(|(_, v)| *v).sum();
                prop_assert_eq!(ledger.total_used(), sum);
            }
        }

        #[test]
        fn prop_refund_aborts_iff_over_allocation(
            used in 0u64..1_000,
            other in 0u64..1_000,
            refund in 0u64..2_500,
        ) {
            let mut ledger = GasLedger::new();
            ledger.use_gas(addr(1), used);
            ledger.use_gas(addr(2), other);

            let should_abort = refund > ledger.total_used() || refund > ledger.used_by(&addr(1));
            let result = std::panic::catch_unwind(move || {
                let mut ledger = ledger;
                ledger.refund_gas(addr(1), refund);
                ledger.total_used()
            });

            prop_assert_eq!(result.is_err(), should_abort);
            if let Ok(total) = result {
                prop_assert_eq!(total, used + other - refund);
            }
        }
    }
}
