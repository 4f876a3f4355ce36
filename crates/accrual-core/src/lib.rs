//! Gas Accrual Core
//!
//! Deterministic gas-value accounting between an EVM-style execution engine and
//! its persistent world state.
//!
//! After a transaction or block consumes gas, this crate answers how much of that
//! gas's wei value accrues to each contract that caused it, versus a default
//! protocol recipient, and persists the accrual so it survives across executions.
//!
//! # Core Modules
//!
//! - [`state`]: The [`StateDb`](state::StateDb) storage capability and an in-memory implementation
//! - [`accrual`]: Gas ledger, slot codec/addressing, accrual record store, and distribution
//! - [`errors`]: Recoverable format errors and fatal invariant violations
//!
//! # Example
//!
//! ```
//! use gas_accrual_core::accrual::{AccrualParameters, AccrualStore, GasDistributor, GasLedger};
//! use gas_accrual_core::state::{InMemoryStateDb, StateDb};
//! use gas_accrual_core::{Address, U256};
//!
//! let params = AccrualParameters::default();
//! let mut state = InMemoryStateDb::new();
//! let contract = Address::with_last_byte(1);
//!
//! // The contract opts in to receiving its share
//! AccrualStore::new(params.system_address)
//!     .set_accrues(&mut state, &contract, true)
//!     .unwrap();
//!
//! // The interpreter attributes gas while executing
//! let mut ledger = GasLedger::new();
//! ledger.use_gas(contract, 5);
//!
//! // At finalization the ledger is consumed by the distributor
//! let summary = GasDistributor::new(params.clone())
//!     .distribute(ledger, U256::from(2u64), 0, &mut state, 1)
//!     .unwrap();
//!
//! assert_eq!(summary.claimable_value, U256::from(10u64));
//! assert_eq!(state.get_balance(&params.system_address), U256::from(10u64));
//! ```

pub mod accrual;
pub mod errors;
pub mod state;

pub use alloy_primitives::{Address, B256, U256};
pub use errors::{AccrualError, InvariantViolation};
pub use state::{InMemoryStateDb, StateDb};
