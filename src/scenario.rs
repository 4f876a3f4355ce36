//! Scripted distribution scenarios.
//!
//! A scenario is a JSON document that opts contracts in, then replays ordered
//! rounds of gas usage through the distributor against an [`InMemoryStateDb`].
//! Each round is one finalized ledger.
//!
//! ```json
//! {
//!   "opted_in": ["0x1", "0x2"],
//!   "rounds": [
//!     {
//!       "gas_price": "3",
//!       "refund": 7,
//!       "timestamp": 1,
//!       "usage": [
//!         { "address": "0x1", "amount": 5 },
//!         { "address": "0x2", "amount": 10 },
//!         { "address": "0x3", "amount": 10 }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Inputs are validated before anything runs: refunds beyond a contract's usage,
//! usage overflowing a u64, and timestamps that go backwards or past 32 bits are
//! reported as errors instead of reaching the distributor's fatal paths. Before
//! each round the accrual it would apply is projected against the current
//! records, so a gas price that would outgrow a record's cell or a 256-bit
//! balance is rejected as well.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use gas_accrual_core::accrual::{
    AccrualParameters, AccrualRecord, AccrualStore, DistributionSummary, GasDistributor, GasLedger,
    BALANCE_BYTES, VALUE_SECONDS_BYTES,
};
use gas_accrual_core::{Address, InMemoryStateDb, StateDb, U256};
use gas_accrual_types::{parse_address_ctx, parse_u256};

/// Scenario document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Contracts opted in before the first round
    #[serde(default)]
    pub opted_in: Vec<String>,
    /// Rounds in execution order
    #[serde(default)]
    pub rounds: Vec<RoundSpec>,
}

/// One finalized ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoundSpec {
    /// Wei per gas, decimal or 0x-hex
    pub gas_price: String,
    /// Gas refunded to the sender before distribution
    #[serde(default)]
    pub refund: u64,
    /// Block timestamp in seconds
    pub timestamp: u64,
    /// `use_gas` calls, in order
    #[serde(default)]
    pub usage: Vec<GasEntry>,
    /// `refund_gas` calls, applied after all usage
    #[serde(default)]
    pub refunds: Vec<GasEntry>,
    /// Contracts that opt in before this round
    #[serde(default)]
    pub opt_in: Vec<String>,
    /// Contracts that opt out before this round
    #[serde(default)]
    pub opt_out: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GasEntry {
    pub address: String,
    pub amount: u64,
}

/// Final state after replaying a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub parameters: AccrualParameters,
    /// One summary per round
    pub rounds: Vec<DistributionSummary>,
    /// Record of every contract the scenario touched, absent ones as zero
    pub records: BTreeMap<Address, AccrualRecord>,
    pub default_recipient_balance: U256,
    pub escrow_balance: U256,
}

/// Read a scenario from a file, or stdin when `path` is `-` and `allow_stdin` is set.
pub fn read_scenario(path: &Path, allow_stdin: bool) -> Result<ScenarioSpec> {
    let json_str = if allow_stdin && path.as_os_str() == "-" {
        use std::io::Read;
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario: {}", path.display()))?
    };
    ScenarioSpec::from_json(&json_str)
}

impl ScenarioSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse scenario JSON")
    }

    /// Replay every round against a fresh in-memory state.
    pub fn run(&self, params: &AccrualParameters) -> Result<ScenarioReport> {
        let plan = self.validate()?;
        let mut state = InMemoryStateDb::new();
        let store = AccrualStore::new(params.system_address);
        let distributor = GasDistributor::new(params.clone());

        for address in &plan.opted_in {
            store.set_accrues(&mut state, address, true)?;
        }

        let mut summaries = Vec::with_capacity(plan.rounds.len());
        for (index, round) in plan.rounds.into_iter().enumerate() {
            for address in &round.opt_in {
                store.set_accrues(&mut state, address, true)?;
            }
            for address in &round.opt_out {
                store.set_accrues(&mut state, address, false)?;
            }

            check_round(index, &round, &state, &store, params)?;

            let mut ledger = GasLedger::new();
            for (address, amount) in &round.usage {
                ledger.use_gas(*address, *amount);
            }
            for (address, amount) in &round.refunds {
                ledger.refund_gas(*address, *amount);
            }

            let summary = distributor
                .distribute(
                    ledger,
                    round.gas_price,
                    round.refund,
                    &mut state,
                    round.timestamp,
                )
                .with_context(|| format!("round {}", index))?;
            tracing::info!(
                round = index,
                distributed = summary.distributed,
                remaining = summary.remaining,
                claimable_value = %summary.claimable_value,
                "scenario: round complete"
            );
            summaries.push(summary);
        }

        let mut records = BTreeMap::new();
        for address in plan.touched {
            records.insert(address, store.read(&state, &address)?);
        }

        Ok(ScenarioReport {
            parameters: params.clone(),
            rounds: summaries,
            records,
            default_recipient_balance: state.get_balance(&params.default_recipient),
            escrow_balance: state.get_balance(&params.system_address),
        })
    }

    /// Parse every field and check the caller-side preconditions of the ledger
    /// and distributor.
    fn validate(&self) -> Result<Plan> {
        let mut touched = BTreeSet::new();
        let opted_in = parse_addresses(&self.opted_in, "opted_in", &mut touched)?;

        let mut rounds = Vec::with_capacity(self.rounds.len());
        let mut last_timestamp = 0u64;
        for (index, entry) in self.rounds.iter().enumerate() {
            let round = entry
                .parse(&mut touched)
                .with_context(|| format!("round {}", index))?;
            if round.timestamp < last_timestamp {
                bail!(
                    "round {}: timestamp {} is earlier than the previous round's {}",
                    index,
                    round.timestamp,
                    last_timestamp
                );
            }
            last_timestamp = round.timestamp;
            rounds.push(round);
        }

        Ok(Plan {
            opted_in,
            rounds,
            touched,
        })
    }
}

struct Plan {
    opted_in: Vec<Address>,
    rounds: Vec<Round>,
    touched: BTreeSet<Address>,
}

struct Round {
    gas_price: U256,
    refund: u64,
    timestamp: u64,
    usage: Vec<(Address, u64)>,
    refunds: Vec<(Address, u64)>,
    /// Net allocation per contract once refunds are applied
    allocations: BTreeMap<Address, u64>,
    total_used: u64,
    opt_in: Vec<Address>,
    opt_out: Vec<Address>,
}

impl RoundSpec {
    fn parse(&self, touched: &mut BTreeSet<Address>) -> Result<Round> {
        if self.timestamp > u32::MAX as u64 {
            bail!("timestamp {} does not fit in 32 bits", self.timestamp);
        }
        let gas_price = parse_u256(&self.gas_price, "gas price")?;

        let usage = parse_entries(&self.usage, "usage", touched)?;
        let refunds = parse_entries(&self.refunds, "refunds", touched)?;

        let mut allocations: BTreeMap<Address, u64> = BTreeMap::new();
        let mut total = 0u64;
        for (address, amount) in &usage {
            let allocation = allocations.entry(*address).or_insert(0);
            *allocation = allocation
                .checked_add(*amount)
                .ok_or_else(|| anyhow!("gas usage overflows u64"))?;
            total = total
                .checked_add(*amount)
                .ok_or_else(|| anyhow!("gas usage overflows u64"))?;
        }
        for (address, amount) in &refunds {
            let allocation = allocations.get(address).copied().unwrap_or(0);
            if *amount > allocation {
                bail!(
                    "refund of {} for {} exceeds its usage of {}",
                    amount,
                    address,
                    allocation
                );
            }
            allocations.insert(*address, allocation - amount);
            total -= amount;
        }

        Ok(Round {
            gas_price,
            refund: self.refund,
            timestamp: self.timestamp,
            usage,
            refunds,
            allocations,
            total_used: total,
            opt_in: parse_addresses(&self.opt_in, "opt_in", touched)?,
            opt_out: parse_addresses(&self.opt_out, "opt_out", touched)?,
        })
    }
}

/// Reject a round whose distribution would overflow a record field or balance.
///
/// Mirrors the distributor's share arithmetic against the records as they stand
/// after this round's opt-in changes.
fn check_round(
    index: usize,
    round: &Round,
    state: &InMemoryStateDb,
    store: &AccrualStore,
    params: &AccrualParameters,
) -> Result<()> {
    if round.total_used == 0 || round.total_used <= round.refund {
        return Ok(());
    }
    let remaining = round.total_used - round.refund;
    let billable = U256::from(remaining)
        .checked_mul(round.gas_price)
        .ok_or_else(|| {
            anyhow!(
                "round {}: gas price {} for {} billable gas exceeds 256 bits",
                index,
                round.gas_price,
                remaining
            )
        })?;

    let balance_limit = U256::from(1u64) << (BALANCE_BYTES * 8);
    let value_seconds_limit = U256::from(1u64) << (VALUE_SECONDS_BYTES * 8);
    for (address, amount) in &round.allocations {
        let record = store.read(state, address)?;
        let share = (remaining as u128 * *amount as u128 / round.total_used as u128) as u64;
        // share <= remaining, so this cannot exceed billable
        let value = U256::from(share) * round.gas_price;
        if !record.accrues || value.is_zero() {
            continue;
        }

        let elapsed = round.timestamp.saturating_sub(record.last_updated);
        let balance = record.balance.checked_add(value);
        let value_seconds = record
            .balance
            .checked_mul(U256::from(elapsed))
            .and_then(|held| record.value_seconds.checked_add(held));
        if !balance.is_some_and(|b| b < balance_limit) {
            bail!(
                "round {}: balance of {} would exceed {} bytes",
                index,
                address,
                BALANCE_BYTES
            );
        }
        if !value_seconds.is_some_and(|v| v < value_seconds_limit) {
            bail!(
                "round {}: value seconds of {} would exceed {} bytes",
                index,
                address,
                VALUE_SECONDS_BYTES
            );
        }
    }

    for account in [&params.default_recipient, &params.system_address] {
        if state.get_balance(account).checked_add(billable).is_none() {
            bail!(
                "round {}: crediting {} wei to {} exceeds 256 bits",
                index,
                billable,
                account
            );
        }
    }
    Ok(())
}

fn parse_addresses(
    raw: &[String],
    context: &str,
    touched: &mut BTreeSet<Address>,
) -> Result<Vec<Address>> {
    raw.iter()
        .map(|addr| {
            let address = parse_address_ctx(addr, context)?;
            touched.insert(address);
            Ok(address)
        })
        .collect()
}

fn parse_entries(
    entries: &[GasEntry],
    context: &str,
    touched: &mut BTreeSet<Address>,
) -> Result<Vec<(Address, u64)>> {
    entries
        .iter()
        .map(|entry| {
            let address = parse_address_ctx(&entry.address, context)?;
            touched.insert(address);
            Ok((address, entry.amount))
        })
        .collect()
}
