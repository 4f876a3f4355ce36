//! JSON output for gas-accrual commands.
//!
//! Every command writes one pretty-printed JSON document to stdout (or a file)
//! so results can be piped into other tools. Logs go to stderr.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use gas_accrual::{AccrualRecord, B256};

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

/// Write `value` as pretty JSON to `path`.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    std::fs::write(path, to_json(value)? + "\n")
        .with_context(|| format!("Failed to write output: {}", path.display()))
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("serialize output")
}

/// Full lowercase hex of a cell or slot key.
pub fn format_cell(cell: &B256) -> String {
    format!("0x{}", hex::encode(cell.as_slice()))
}

/// An accrual record with amounts in decimal.
#[derive(Debug, Serialize)]
pub struct RecordView {
    pub accrues: bool,
    pub balance: String,
    pub value_seconds: String,
    pub last_updated: u64,
}

impl From<&AccrualRecord> for RecordView {
    fn from(record: &AccrualRecord) -> Self {
        Self {
            accrues: record.accrues,
            balance: record.balance.to_string(),
            value_seconds: record.value_seconds.to_string(),
            last_updated: record.last_updated,
        }
    }
}
