//! Capacity command - report how much a carrier can hold.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use lsbhide::LoadedCarrier;

use super::{CommandExecutor, EngineArgs, SelectionArgs};

/// Show the slot count and maximum payload size of a carrier.
#[derive(Args, Debug)]
pub struct CapacityCommand {
    /// Path to the carrier (PNG, BMP or WAV)
    #[arg(short, long)]
    pub carrier: PathBuf,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub engine: EngineArgs,
}

impl CommandExecutor for CapacityCommand {
    fn execute(&self) -> Result<()> {
        let loaded = LoadedCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to read carrier {}", self.carrier.display()))?;

        let selection = self.selection.to_params().selection(&loaded.carrier)?;
        let report = self.engine.engine().capacity(&loaded.carrier, &selection)?;

        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}
