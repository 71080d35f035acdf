//! lsbhide - keyed LSB steganography for images and WAV audio
//!
//! Hides a message or file in the low bits of a PNG/BMP image or a PCM WAV
//! file, and recovers it with the same key, generator and bit selection.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CapacityCommand, CommandExecutor, DecodeCommand, EncodeCommand};

/// lsbhide - keyed LSB steganography
///
/// Bit positions are chosen per color channel for images (--r-bits, --g-bits,
/// --b-bits) or as a low-bit count for WAV audio (--lsb-count).
#[derive(Parser)]
#[command(name = "lsbhide")]
#[command(version)]
#[command(about = "Hide and recover payloads in image and audio LSBs")]
#[command(long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hide a message or file in a carrier
    Encode(EncodeCommand),

    /// Recover a hidden payload (prints a JSON response)
    Decode(DecodeCommand),

    /// Show how many bytes a carrier can hold
    Capacity(CapacityCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let command: &dyn CommandExecutor = match &cli.command {
        Commands::Encode(cmd) => cmd,
        Commands::Decode(cmd) => cmd,
        Commands::Capacity(cmd) => cmd,
    };

    command.execute()
}
