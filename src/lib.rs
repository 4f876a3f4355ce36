//! Gas Accrual
//!
//! Deterministic gas-value accounting for EVM-style execution:
//!
//! - **Gas ledger**: per-execution attribution of gas to the contracts that used it
//! - **Slot codec**: bit-exact 32-byte packing of per-contract accrual records
//! - **Record store**: records kept in a system account's storage namespace
//! - **Distribution**: proportional split of net billable gas between opted-in
//!   contracts and a default recipient
//! - **Scenarios**: replay of scripted rounds against an in-memory state, used by
//!   the `gas-accrual` CLI
//!
//! The core lives in [`gas_accrual_core`] and is re-exported here; see
//! [`scenario`] for the replay format and [`config`] for environment overrides.

pub mod config;
pub mod scenario;

pub use gas_accrual_core::accrual::{
    contract_slot, decode, distribute, encode, AccrualParameters, AccrualRecord, AccrualStore,
    ContractShare, DistributionSummary, GasDistributor, GasLedger,
};
pub use gas_accrual_core::{
    AccrualError, Address, InMemoryStateDb, InvariantViolation, StateDb, B256, U256,
};
pub use gas_accrual_core::{accrual, errors, state};
pub use gas_accrual_types as types;
