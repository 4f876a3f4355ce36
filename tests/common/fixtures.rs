//! Test fixtures: addresses, scenario files, and an in-memory state harness.

use std::path::{Path, PathBuf};

use gas_accrual::scenario::{read_scenario, ScenarioSpec};
use gas_accrual::{
    AccrualParameters, AccrualRecord, AccrualStore, Address, DistributionSummary, GasDistributor,
    GasLedger, InMemoryStateDb, StateDb, U256,
};

/// Scenario fixtures directory relative to the project root.
pub const FIXTURE_DIR: &str = "tests/fixtures";

/// Address whose last byte is `n`; `addr(1)` is `0x00..01`.
pub fn addr(n: u8) -> Address {
    Address::with_last_byte(n)
}

/// Absolute path of a file in [`FIXTURE_DIR`].
#[allow(dead_code)]
pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join(FIXTURE_DIR)
        .join(name)
}

/// Load a scenario fixture.
///
/// # Panics
///
/// Panics if the fixture is missing or malformed.
#[allow(dead_code)]
pub fn load_scenario(name: &str) -> ScenarioSpec {
    read_scenario(&fixture_path(name), false).expect("scenario fixture should load")
}

/// In-memory state plus the accounts a distribution touches.
#[allow(dead_code)]
pub struct Harness {
    pub state: InMemoryStateDb,
    pub params: AccrualParameters,
}

#[allow(dead_code)]
impl Harness {
    pub fn new() -> Self {
        Self::with_params(AccrualParameters::default())
    }

    pub fn with_params(params: AccrualParameters) -> Self {
        Self {
            state: InMemoryStateDb::new(),
            params,
        }
    }

    pub fn store(&self) -> AccrualStore {
        AccrualStore::new(self.params.system_address)
    }

    pub fn opt_in(&mut self, contract: Address) {
        let store = self.store();
        store
            .set_accrues(&mut self.state, &contract, true)
            .expect("opt in");
    }

    pub fn opt_out(&mut self, contract: Address) {
        let store = self.store();
        store
            .set_accrues(&mut self.state, &contract, false)
            .expect("opt out");
    }

    /// Distribute one ledger built from `usage`.
    pub fn distribute(
        &mut self,
        usage: &[(Address, u64)],
        gas_price: u64,
        refund: u64,
        timestamp: u64,
    ) -> DistributionSummary {
        let mut ledger = GasLedger::new();
        for (contract, amount) in usage {
            ledger.use_gas(*contract, *amount);
        }
        GasDistributor::new(self.params.clone())
            .distribute(
                ledger,
                U256::from(gas_price),
                refund,
                &mut self.state,
                timestamp,
            )
            .expect("distribute")
    }

    pub fn record(&self, contract: Address) -> AccrualRecord {
        self.store()
            .read(&self.state, &contract)
            .expect("read record")
    }

    pub fn default_balance(&self) -> U256 {
        self.state.get_balance(&self.params.default_recipient)
    }

    pub fn escrow_balance(&self) -> U256 {
        self.state.get_balance(&self.params.system_address)
    }
}
