use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use gas_accrual::scenario::read_scenario;
use gas_accrual::AccrualParameters;

use super::output::{print_json, write_json};

#[derive(Parser, Debug)]
#[command(about = "Replay a JSON scenario of gas usage rounds against in-memory state")]
pub struct SimulateCmd {
    /// Scenario file, or `-` for stdin
    file: PathBuf,

    /// Write the report here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl SimulateCmd {
    pub fn execute(&self, params: &AccrualParameters) -> Result<()> {
        let scenario = read_scenario(&self.file, true)?;
        tracing::debug!(
            rounds = scenario.rounds.len(),
            opted_in = scenario.opted_in.len(),
            "simulate: loaded scenario"
        );

        let report = scenario
            .run(params)
            .with_context(|| format!("Failed to simulate {}", self.file.display()))?;

        match &self.output {
            Some(path) => {
                write_json(&report, path)?;
                tracing::info!(path = %path.display(), "simulate: report written");
                Ok(())
            }
            None => print_json(&report),
        }
    }
}
