//! `decode` and `encode` subcommands over raw storage cells.

use anyhow::{bail, Result};
use clap::Parser;
use serde::Serialize;

use gas_accrual::accrual::{BALANCE_BYTES, VALUE_SECONDS_BYTES};
use gas_accrual::types::{parse_hex_bytes, parse_u256};
use gas_accrual::{decode, encode, AccrualRecord, U256};

use super::output::{format_cell, print_json, RecordView};

#[derive(Parser, Debug)]
#[command(about = "Decode a 32-byte storage cell into an accrual record")]
pub struct DecodeCmd {
    /// Cell contents as hex, with or without 0x
    cell: String,
}

impl DecodeCmd {
    pub fn execute(&self) -> Result<()> {
        let bytes = parse_hex_bytes(&self.cell, "storage cell")?;
        let record = decode(&bytes)?;
        print_json(&RecordView::from(&record))
    }
}

#[derive(Parser, Debug)]
#[command(about = "Encode an accrual record into a 32-byte storage cell")]
pub struct EncodeCmd {
    /// Mark the contract as opted in
    #[arg(long)]
    accrues: bool,

    /// Claimable balance in wei (decimal or 0x-hex)
    #[arg(long, default_value = "0")]
    balance: String,

    /// Time-weighted balance integral (decimal or 0x-hex)
    #[arg(long, default_value = "0")]
    value_seconds: String,

    /// Timestamp of the last accrual, in seconds
    #[arg(long, default_value_t = 0)]
    last_updated: u64,
}

#[derive(Debug, Serialize)]
struct EncodeOutput {
    cell: String,
    record: RecordView,
}

impl EncodeCmd {
    pub fn execute(&self) -> Result<()> {
        let record = AccrualRecord {
            accrues: self.accrues,
            balance: bounded(&self.balance, "balance", BALANCE_BYTES)?,
            value_seconds: bounded(&self.value_seconds, "value-seconds", VALUE_SECONDS_BYTES)?,
            last_updated: self.last_updated,
        };
        if record.last_updated > u32::MAX as u64 {
            bail!("last-updated {} does not fit in 4 bytes", record.last_updated);
        }

        print_json(&EncodeOutput {
            cell: format_cell(&encode(&record)),
            record: RecordView::from(&record),
        })
    }
}

/// Parse `raw` and check it fits in `width_bytes` before it reaches the codec.
fn bounded(raw: &str, name: &str, width_bytes: usize) -> Result<U256> {
    let value = parse_u256(raw, name)?;
    if value.bit_len() > width_bytes * 8 {
        bail!("{} {} does not fit in {} bytes", name, value, width_bytes);
    }
    Ok(value)
}
