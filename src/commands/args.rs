//! Arguments shared by several commands.

use clap::Args;

use lsbhide::stego::DEFAULT_MAX_SLOTS;
use lsbhide::{EngineConfig, StegoEngine, StegoParams};

/// Key, generator and bit selection, mirroring the HTTP form fields.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Secret key (seeds the keyed slot order)
    #[arg(short, long)]
    pub key: Option<String>,

    /// Slot order: linear or keyed (defaults to linear when omitted)
    #[arg(short, long)]
    pub generator: Option<String>,

    /// Red channel bit positions as a JSON array, e.g. "[0,1]"
    #[arg(long)]
    pub r_bits: Option<String>,

    /// Green channel bit positions as a JSON array
    #[arg(long)]
    pub g_bits: Option<String>,

    /// Blue channel bit positions as a JSON array
    #[arg(long)]
    pub b_bits: Option<String>,

    /// WAV only: low bits per sample minus one (0-6)
    #[arg(long)]
    pub lsb_count: Option<String>,
}

impl SelectionArgs {
    pub fn to_params(&self) -> StegoParams {
        StegoParams {
            secret_key: self.key.clone(),
            generator_type: self.generator.clone(),
            r_bits: self.r_bits.clone(),
            g_bits: self.g_bits.clone(),
            b_bits: self.b_bits.clone(),
            lsb_count: self.lsb_count.clone(),
        }
    }
}

/// Engine limits.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Reject carriers with more slots than this
    #[arg(long, default_value_t = DEFAULT_MAX_SLOTS)]
    pub max_slots: usize,
}

impl EngineArgs {
    pub fn engine(&self) -> StegoEngine {
        StegoEngine::new(EngineConfig {
            max_slots: self.max_slots,
        })
    }
}
