//! gas-accrual: inspect and simulate gas-value accrual state
//!
//! ## Commands
//!
//! - **slot-key**: Derive where a contract's accrual record is stored
//! - **decode**: Unpack a raw 32-byte storage cell
//! - **encode**: Pack record fields into a storage cell
//! - **simulate**: Replay a JSON scenario of gas usage rounds
//!
//! ## Example Usage
//!
//! ```bash
//! # Slot key of contract 0x1 in the system account's storage
//! gas-accrual slot-key 0x1
//!
//! # Decode a cell read from a node
//! gas-accrual decode 0x0100000000000000000000000a00000000000000000000000000000000000001
//!
//! # Replay a scenario with debug logging
//! gas-accrual --verbose simulate rounds.json --output report.json
//! ```
//!
//! The system and default-recipient accounts come from
//! `GAS_ACCRUAL_SYSTEM_ADDRESS` / `GAS_ACCRUAL_DEFAULT_RECIPIENT` when set, and
//! from `--system-address` / `--default-recipient` over those.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gas_accrual::types::parse_address_ctx;
use gas_accrual::config::params_from_env;
use gas_accrual::AccrualParameters;

mod accrual_cli;

use accrual_cli::{
    codec::{DecodeCmd, EncodeCmd},
    simulate::SimulateCmd,
    slot_key::SlotKeyCmd,
};

#[derive(Parser)]
#[command(
    name = "gas-accrual",
    author,
    version,
    about = "Inspect and simulate per-contract gas-value accrual",
    long_about = "Tools for the gas accrual layer: storage slot derivation, record \
                  encoding and decoding, and offline replay of distribution rounds.\n\n\
                  All results are printed as JSON on stdout; logs go to stderr."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// System account holding accrual records (overrides the environment)
    #[arg(long, global = true)]
    system_address: Option<String>,

    /// Default recipient account (overrides the environment)
    #[arg(long, global = true)]
    default_recipient: Option<String>,

    /// Verbose output (debug logs on stderr)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the storage slot of a contract's accrual record
    SlotKey(SlotKeyCmd),

    /// Decode a 32-byte storage cell
    Decode(DecodeCmd),

    /// Encode record fields into a storage cell
    Encode(EncodeCmd),

    /// Replay a JSON scenario against in-memory state
    Simulate(SimulateCmd),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_params(
    system_address: Option<&str>,
    default_recipient: Option<&str>,
) -> Result<AccrualParameters> {
    let mut params = params_from_env().context("Invalid accrual configuration")?;
    if let Some(raw) = system_address {
        params.system_address = parse_address_ctx(raw, "system")?;
    }
    if let Some(raw) = default_recipient {
        params.default_recipient = parse_address_ctx(raw, "default recipient")?;
    }
    Ok(params)
}

fn main() -> Result<()> {
    let Cli {
        command,
        system_address,
        default_recipient,
        verbose,
    } = Cli::parse();
    init_tracing(verbose);

    let params = resolve_params(system_address.as_deref(), default_recipient.as_deref())?;
    tracing::debug!(
        system_address = %params.system_address,
        default_recipient = %params.default_recipient,
        "accrual parameters"
    );

    match command {
        Commands::SlotKey(cmd) => cmd.execute(&params),
        Commands::Decode(cmd) => cmd.execute(),
        Commands::Encode(cmd) => cmd.execute(),
        Commands::Simulate(cmd) => cmd.execute(&params),
    }
}
