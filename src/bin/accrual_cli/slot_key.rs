use anyhow::Result;
use clap::Parser;
use serde::Serialize;

use gas_accrual::types::{address_to_string, parse_address_ctx};
use gas_accrual::{contract_slot, AccrualParameters};

use super::output::{format_cell, print_json};

#[derive(Parser, Debug)]
#[command(about = "Derive the storage slot of a contract's accrual record")]
pub struct SlotKeyCmd {
    /// Contract address (short forms like 0x1 are zero-padded)
    address: String,
}

#[derive(Debug, Serialize)]
struct SlotKeyOutput {
    address: String,
    system_address: String,
    slot: String,
}

impl SlotKeyCmd {
    pub fn execute(&self, params: &AccrualParameters) -> Result<()> {
        let address = parse_address_ctx(&self.address, "contract")?;
        let slot = contract_slot(&address);

        print_json(&SlotKeyOutput {
            address: address_to_string(&address),
            system_address: address_to_string(&params.system_address),
            slot: format_cell(&slot),
        })
    }
}
