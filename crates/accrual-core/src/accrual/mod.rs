//! Gas-value attribution and accrual for contracts.
//!
//! # Architecture
//!
//! The accrual system has several layers, leaves first:
//!
//! 1. **Slot Codec** - Packs an [`AccrualRecord`] into one 32-byte storage cell
//! 2. **Slot Addressing** - Derives the cell key for a contract from its address
//! 3. **Accrual Record Store** - Read-modify-write of records through a [`StateDb`](crate::state::StateDb)
//! 4. **Gas Ledger** - Ephemeral per-execution attribution of gas to contracts
//! 5. **Gas Distributor** - Converts the finalized ledger into wei shares, updates
//!    records of opted-in contracts, and credits the default recipient and the
//!    claims escrow
//!
//! Data flows interpreter -> [`GasLedger`] (repeated `use_gas`/`refund_gas`)
//! -> [`GasDistributor::distribute`] (once per ledger) -> [`AccrualStore::accrue`]
//! per opted-in contract -> balance credits.
//!
//! # Cell Layout
//!
//! ```text
//! offset  0      1             13                  28        32
//!         +------+-------------+-------------------+---------+
//!         |accrue|  balance    |   value_seconds   | last_upd|
//!         | 1 B  |   12 B      |       15 B        |   4 B   |
//!         +------+-------------+-------------------+---------+
//! ```
//!
//! Every field is big-endian. Records live in the storage of
//! [`AccrualParameters::system_address`], never in the contract's own storage.

mod codec;
mod distribution;
mod ledger;
mod params;
mod slot;
mod store;
mod summary;

pub use codec::{decode, encode, AccrualRecord};
pub use distribution::{distribute, GasDistributor};
pub use ledger::GasLedger;
pub use params::{
    AccrualParameters, ACCRUES_BYTES, BALANCE_BYTES, CELL_BYTES, DEFAULT_RECIPIENT_ADDRESS,
    DEFAULT_SYSTEM_ADDRESS, LAST_UPDATED_BYTES, SLOT_DOMAIN,
    VALUE_SECONDS_BYTES,
};
pub use slot::contract_slot;
pub use store::AccrualStore;
pub use summary::{ContractShare, DistributionSummary};
