//! Proportional distribution of a finalized ledger.
//!
//! Net billable gas (`total_used - refund`) is split across the contracts in the
//! ledger in proportion to their allocation, rounding each share down. Opted-in
//! contracts have their share's value accrued to their record; every other share
//! and the rounding remainder go to the default recipient. The system account is
//! credited with the aggregate value now owed to opted-in contracts.
//!
//! All arithmetic is exact integer arithmetic, so the outcome does not depend on
//! the order in which the ledger's allocations are visited.

use alloy_primitives::{Address, U256};
use gas_accrual_types::short_address;

use super::ledger::GasLedger;
use super::params::AccrualParameters;
use super::store::AccrualStore;
use super::summary::{ContractShare, DistributionSummary};
use crate::errors::{abort_on_violation, AccrualError, InvariantViolation};
use crate::state::StateDb;

/// Distributes finalized ledgers against a state database.
#[derive(Debug, Clone, Default)]
pub struct GasDistributor {
    params: AccrualParameters,
}

impl GasDistributor {
    pub fn new(params: AccrualParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &AccrualParameters {
        &self.params
    }

    /// Distribute the value of `ledger`'s net billable gas.
    ///
    /// Consumes the ledger: distributing the same usage twice would double
    /// count it. When `refund` covers all recorded usage nothing is touched and
    /// the returned summary has `distributed == false`.
    ///
    /// # Panics
    ///
    /// Aborts on an invariant violation: shares summing past the net billable
    /// gas, a timestamp earlier than a record's last update, or a record
    /// outgrowing its cell.
    pub fn distribute<S: StateDb>(
        &self,
        ledger: GasLedger,
        gas_price: U256,
        refund: u64,
        state: &mut S,
        timestamp: u64,
    ) -> Result<DistributionSummary, AccrualError> {
        let total_used = ledger.total_used();
        self.distribute_allocations(
            ledger.allocations().map(|(address, amount)| (*address, *amount)),
            total_used,
            gas_price,
            refund,
            state,
            timestamp,
        )
    }

    /// Distribute an explicit allocation list, visited in the given order.
    pub(crate) fn distribute_allocations<S, I>(
        &self,
        allocations: I,
        total_used: u64,
        gas_price: U256,
        refund: u64,
        state: &mut S,
        timestamp: u64,
    ) -> Result<DistributionSummary, AccrualError>
    where
        S: StateDb,
        I: IntoIterator<Item = (Address, u64)>,
    {
        if total_used == 0 || total_used <= refund {
            tracing::debug!(
                total_used = total_used,
                refund = refund,
                "distribution: nothing to distribute"
            );
            return Ok(DistributionSummary::skipped(total_used, refund, gas_price));
        }

        let store = AccrualStore::new(self.params.system_address);
        let remaining = total_used - refund;
        let mut summary = DistributionSummary {
            total_used,
            refund,
            remaining,
            gas_price,
            distributed: true,
            ..DistributionSummary::default()
        };

        let mut accounted_shares: u128 = 0;
        let mut accrued_shares: u64 = 0;

        for (address, amount) in allocations {
            // amount <= total_used, so the share fits back into u64
            let share = (remaining as u128 * amount as u128 / total_used as u128) as u64;
            accounted_shares += share as u128;

            let value = share_value(share, gas_price, "contract share");
            let record = store.read(&*state, &address)?;
            let accrued = record.accrues;

            if accrued {
                accrued_shares += share;
                if !value.is_zero() {
                    store.accrue(state, &address, value, timestamp)?;
                }
            }

            tracing::trace!(
                address = %short_address(&address),
                amount = amount,
                share = share,
                accrued = accrued,
                "distribution: apportioned share"
            );

            summary.contracts.insert(
                address,
                ContractShare {
                    share,
                    value,
                    accrued,
                },
            );
        }

        if accounted_shares > remaining as u128 {
            abort_on_violation(InvariantViolation::DistributionOverflow {
                accounted: accounted_shares,
                remaining,
            });
        }

        // accrued_shares <= accounted_shares <= remaining past the check above
        let default_shares = remaining - accrued_shares;
        let default_value = share_value(default_shares, gas_price, "default recipient value");
        let claimable_value = share_value(accrued_shares, gas_price, "claimable value");

        state.add_balance(&self.params.default_recipient, default_value);
        state.add_balance(&self.params.system_address, claimable_value);

        summary.accounted_shares = accounted_shares as u64;
        summary.accrued_shares = accrued_shares;
        summary.default_shares = default_shares;
        summary.default_value = default_value;
        summary.claimable_value = claimable_value;

        tracing::debug!(
            total_used = total_used,
            refund = refund,
            remaining = remaining,
            contracts = summary.contracts.len(),
            accrued_shares = accrued_shares,
            default_shares = default_shares,
            default_value = %default_value,
            claimable_value = %claimable_value,
            "distribution: complete"
        );

        Ok(summary)
    }
}

/// Distribute `ledger` with the default protocol accounts.
pub fn distribute<S: StateDb>(
    ledger: GasLedger,
    gas_price: U256,
    refund: u64,
    state: &mut S,
    timestamp: u64,
) -> Result<DistributionSummary, AccrualError> {
    GasDistributor::default().distribute(ledger, gas_price, refund, state, timestamp)
}

fn share_value(shares: u64, gas_price: U256, context: &'static str) -> U256 {
    match U256::from(shares).checked_mul(gas_price) {
        Some(value) => value,
        None => abort_on_violation(InvariantViolation::ValueOverflow { context }),
    }
}
