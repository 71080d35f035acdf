//! Decode command - recover a hidden payload from a carrier.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use lsbhide::{DecodeResponse, LoadedCarrier, RequestError};

use super::{CommandExecutor, EngineArgs, SelectionArgs};

/// Recover a payload hidden with the same key, generator and bit selection.
///
/// Prints the JSON decode response. "found": false means the carrier holds
/// nothing for these parameters; invalid parameters exit with an error.
#[derive(Args, Debug)]
pub struct DecodeCommand {
    /// Path to the carrier (PNG, BMP or WAV)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Write the raw payload bytes to this file when found
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub engine: EngineArgs,
}

impl CommandExecutor for DecodeCommand {
    fn execute(&self) -> Result<()> {
        let loaded = LoadedCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to read carrier {}", self.carrier.display()))?;

        let engine = self.engine.engine();
        let outcome = self
            .selection
            .to_params()
            .resolve(&loaded.carrier)
            .and_then(|request| {
                engine
                    .decode(&loaded.carrier, &request.generator, &request.selection)
                    .map_err(RequestError::from)
            });

        let result = match outcome {
            Ok(result) => result,
            Err(err) => {
                println!("{}", serde_json::to_string_pretty(&DecodeResponse::error(&err))?);
                anyhow::bail!("{}: {}", err.status(), err);
            }
        };

        if let (Some(path), Some(payload)) = (&self.output, result.payload()) {
            std::fs::write(path, payload)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {} payload bytes to {}", payload.len(), path.display());
        }

        println!(
            "{}",
            serde_json::to_string_pretty(&DecodeResponse::success(&result))?
        );
        Ok(())
    }
}
