//! Distribution summary and output structures.
//!
//! A [`DistributionSummary`] reports what one call to
//! [`GasDistributor::distribute`](super::GasDistributor::distribute) did: the
//! gas totals it worked from, how the net billable gas was split between
//! opted-in contracts and the default recipient, and the wei credited to each
//! side.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// One contract's part of a distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractShare {
    /// Gas units apportioned to the contract
    pub share: u64,
    /// `share * gas_price`, in wei
    pub value: U256,
    /// Whether the value was credited to the contract's record
    pub accrued: bool,
}

/// Outcome of distributing a finalized ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionSummary {
    /// Gas recorded by the ledger
    pub total_used: u64,

    /// Gas refunded before distribution
    pub refund: u64,

    /// Net billable gas (`total_used - refund`), zero when skipped
    pub remaining: u64,

    /// Sum of proportional shares over all contracts
    pub accounted_shares: u64,

    /// Sum of shares credited to opted-in contracts
    pub accrued_shares: u64,

    /// Shares routed to the default recipient, rounding remainder included
    pub default_shares: u64,

    /// Wei per unit of gas
    pub gas_price: U256,

    /// Wei credited to the default recipient
    pub default_value: U256,

    /// Wei credited to the claims escrow, mirroring the opted-in records
    pub claimable_value: U256,

    /// False when the refund absorbed all usage and nothing was touched
    pub distributed: bool,

    /// Per-contract breakdown, ordered by address
    pub contracts: BTreeMap<Address, ContractShare>,
}

impl DistributionSummary {
    /// Summary of a distribution that had nothing to do.
    pub fn skipped(total_used: u64, refund: u64, gas_price: U256) -> Self {
        Self {
            total_used,
            refund,
            gas_price,
            ..Self::default()
        }
    }

    /// Value of the net billable gas.
    pub fn total_value(&self) -> U256 {
        U256::from(self.remaining) * self.gas_price
    }

    /// Value actually credited. Equals [`total_value`](Self::total_value)
    /// for every completed distribution.
    pub fn credited_value(&self) -> U256 {
        self.default_value + self.claimable_value
    }

    /// Share recorded for `address`, if it was in the ledger.
    pub fn share_of(&self, address: &Address) -> Option<&ContractShare> {
        self.contracts.get(address)
    }

    /// Contracts whose share was credited to their record.
    pub fn accruing_contracts(&self) -> impl Iterator<Item = &Address> {
        self.contracts
            .iter()
            .filter(|(_, share)| share.accrued)
            .map(|(address, _)| address)
    }

    /// Rounding remainder: net billable gas no contract's share covered.
    pub fn rounding_remainder(&self) -> u64 {
        self.remaining.saturating_sub(self.accounted_shares)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_summary() {
        let summary = DistributionSummary::skipped(10, 10, U256::from(3u64));
        assert!(!summary.distributed);
        assert_eq!(summary.remaining, 0);
        assert_eq!(summary.total_value(), U256::ZERO);
        assert_eq!(summary.credited_value(), U256::ZERO);
        assert!(summary.contracts.is_empty());
    }

    #[test]
    fn test_accessors() {
        let mut summary = DistributionSummary {
            total_used: 10,
            remaining: 7,
            accounted_shares: 6,
            accrued_shares: 3,
            default_shares: 4,
            gas_price: U256::from(2u64),
            default_value: U256::from(8u64),
            claimable_value: U256::from(6u64),
            distributed: true,
            ..DistributionSummary::default()
        };
        summary.contracts.insert(
            Address::with_last_byte(2),
            ContractShare {
                share: 3,
                value: U256::from(6u64),
                accrued: true,
            },
        );
        summary.contracts.insert(
            Address::with_last_byte(1),
            ContractShare {
                share: 3,
                value: U256::from(6u64),
                accrued: false,
            },
        );

        assert_eq!(summary.total_value(), summary.credited_value());
        assert_eq!(summary.rounding_remainder(), 1);
        assert_eq!(
            summary.accruing_contracts().collect::<Vec<_>>(),
            vec![&Address::with_last_byte(2)]
        );
        assert!(!summary.share_of(&Address::with_last_byte(1)).unwrap().accrued);
        assert!(summary.share_of(&Address::with_last_byte(3)).is_none());
    }
}
