//! Encode command - hide a message or file inside a carrier.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use lsbhide::{handle_encode, LoadedCarrier};

use super::{CommandExecutor, EngineArgs, SelectionArgs};

/// Hide a message or file in an image or WAV carrier.
///
/// Images are always written back as PNG; WAV keeps its original header.
#[derive(Args, Debug)]
pub struct EncodeCommand {
    /// Path to the carrier (PNG, BMP or WAV)
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// Where to write the modified carrier
    #[arg(short, long)]
    pub output: PathBuf,

    /// Text message to hide (mutually exclusive with --file)
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    pub message: Option<String>,

    /// File whose bytes should be hidden (mutually exclusive with --message)
    #[arg(short, long, conflicts_with = "message")]
    pub file: Option<PathBuf>,

    #[command(flatten)]
    pub selection: SelectionArgs,

    #[command(flatten)]
    pub engine: EngineArgs,
}

impl CommandExecutor for EncodeCommand {
    fn execute(&self) -> Result<()> {
        let payload = match (&self.message, &self.file) {
            (Some(message), _) => message.as_bytes().to_vec(),
            (None, Some(path)) => std::fs::read(path)
                .with_context(|| format!("Failed to read payload file {}", path.display()))?,
            (None, None) => anyhow::bail!("Provide either --message or --file"),
        };

        let loaded = LoadedCarrier::from_file(&self.carrier)
            .with_context(|| format!("Failed to read carrier {}", self.carrier.display()))?;

        let params = self.selection.to_params();
        let encoded = handle_encode(&self.engine.engine(), &loaded.carrier, &params, &payload)
            .map_err(|e| anyhow::anyhow!("{}: {}", e.status(), e))?;

        if !loaded.kind.matches_output(&self.output) {
            log::warn!(
                "{} will contain {} data; consider a .{} extension",
                self.output.display(),
                loaded.kind.output_extension().to_uppercase(),
                loaded.kind.output_extension()
            );
        }

        let bytes = loaded.to_bytes(&encoded)?;
        std::fs::write(&self.output, bytes)
            .with_context(|| format!("Failed to write {}", self.output.display()))?;

        log::info!(
            "hid {} bytes in {} ({}), wrote {}",
            payload.len(),
            self.carrier.display(),
            loaded.kind.mime_type(),
            self.output.display()
        );
        Ok(())
    }
}
