//! CLI subcommand implementations for gas-accrual

pub mod codec;
pub mod output;
pub mod simulate;
pub mod slot_key;
