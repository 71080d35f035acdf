//! Encode/decode orchestration.
//!
//! The engine picks the codec for the carrier shape, asks the generator for a
//! slot order over the codec's domain and streams frame bits through it. It
//! holds configuration only, so one engine can serve any number of threads.

use serde::Serialize;

use super::carrier::Carrier;
use super::codec::{ChannelCodec, PixelChannelCodec, SampleChannelCodec};
use super::error::{Result, StegoError};
use super::frame::{self, DecodeResult};
use super::generator::GeneratorSpec;
use super::selection::BitSelection;

/// Default upper bound on the slot domain (2^30 slots).
pub const DEFAULT_MAX_SLOTS: usize = 1 << 30;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Largest slot domain accepted before any order is generated.
    pub max_slots: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_slots: DEFAULT_MAX_SLOTS,
        }
    }
}

/// Embedding capacity of a carrier under a selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityReport {
    /// Carrier shape ("pixels" or "samples").
    pub carrier: &'static str,
    /// Addressable slots.
    pub slots: usize,
    /// Largest payload in bytes once the frame header is accounted for.
    pub max_payload_bytes: usize,
}

/// Stateless LSB encoder/decoder.
#[derive(Debug, Clone, Default)]
pub struct StegoEngine {
    config: EngineConfig,
}

impl StegoEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Reports how many slots and payload bytes `carrier` offers.
    pub fn capacity(&self, carrier: &Carrier, selection: &BitSelection) -> Result<CapacityReport> {
        let slots = match (carrier, selection) {
            (Carrier::Pixels(grid), BitSelection::Pixel(sel)) => {
                PixelChannelCodec::new(grid, sel)?.domain_size()
            }
            (Carrier::Samples(stream), BitSelection::Sample(count)) => {
                SampleChannelCodec::new(stream, *count)?.domain_size()
            }
            _ => return Err(mismatch(carrier)),
        };

        Ok(CapacityReport {
            carrier: carrier.kind(),
            slots,
            max_payload_bytes: frame::max_payload_len(slots),
        })
    }

    /// Hides `payload` in a copy of `carrier` and returns the copy.
    pub fn encode(
        &self,
        carrier: &Carrier,
        generator: &GeneratorSpec,
        selection: &BitSelection,
        payload: &[u8],
    ) -> Result<Carrier> {
        let mut output = carrier.clone();
        self.encode_in_place(&mut output, generator, selection, payload)?;
        Ok(output)
    }

    /// Hides `payload` directly in `carrier`.
    ///
    /// On error the carrier is left untouched: every check runs before the
    /// first bit is written.
    pub fn encode_in_place(
        &self,
        carrier: &mut Carrier,
        generator: &GeneratorSpec,
        selection: &BitSelection,
        payload: &[u8],
    ) -> Result<()> {
        match (carrier, selection) {
            (Carrier::Pixels(grid), BitSelection::Pixel(sel)) => {
                let codec = PixelChannelCodec::new(grid, sel)?;
                self.embed(&codec, grid, generator, payload)
            }
            (Carrier::Samples(stream), BitSelection::Sample(count)) => {
                let codec = SampleChannelCodec::new(stream, *count)?;
                self.embed(&codec, stream, generator, payload)
            }
            (carrier, _) => Err(mismatch(carrier)),
        }
    }

    /// Looks for a frame in `carrier`.
    ///
    /// A wrong key, wrong selection or a carrier that never held a frame all
    /// give `Ok` with `found == false`. `Err` means the inputs themselves are
    /// malformed.
    pub fn decode(
        &self,
        carrier: &Carrier,
        generator: &GeneratorSpec,
        selection: &BitSelection,
    ) -> Result<DecodeResult> {
        match (carrier, selection) {
            (Carrier::Pixels(grid), BitSelection::Pixel(sel)) => {
                let codec = PixelChannelCodec::new(grid, sel)?;
                self.extract(&codec, grid, generator)
            }
            (Carrier::Samples(stream), BitSelection::Sample(count)) => {
                let codec = SampleChannelCodec::new(stream, *count)?;
                self.extract(&codec, stream, generator)
            }
            _ => Err(mismatch(carrier)),
        }
    }

    fn check_domain(&self, domain: usize) -> Result<()> {
        if domain > self.config.max_slots {
            return Err(StegoError::CarrierTooLarge {
                slots: domain as u64,
                limit: self.config.max_slots as u64,
            });
        }
        Ok(())
    }

    fn embed<C: ChannelCodec>(
        &self,
        codec: &C,
        carrier: &mut C::Carrier,
        generator: &GeneratorSpec,
        payload: &[u8],
    ) -> Result<()> {
        let domain = codec.domain_size();
        self.check_domain(domain)?;
        let order = generator.order(domain)?;

        let bits = frame::frame(payload)?;
        let needed = bits.bit_len() as u64;
        if needed > domain as u64 {
            return Err(StegoError::PayloadTooLarge {
                needed,
                available: domain as u64,
            });
        }

        log::debug!(
            "embedding {} payload bytes ({} bits) into {} slots, {} order",
            payload.len(),
            needed,
            domain,
            generator.strategy
        );

        for (slot, bit) in order.zip(bits) {
            codec.write_bit(carrier, slot, bit);
        }
        Ok(())
    }

    fn extract<C: ChannelCodec>(
        &self,
        codec: &C,
        carrier: &C::Carrier,
        generator: &GeneratorSpec,
    ) -> Result<DecodeResult> {
        let domain = codec.domain_size();
        self.check_domain(domain)?;
        let order = generator.order(domain)?;

        let bits = order.map(|slot| codec.read_bit(carrier, slot));
        let result = frame::unframe(bits, domain);

        log::debug!(
            "decode over {} slots, {} order: found={}",
            domain,
            generator.strategy,
            result.found
        );
        Ok(result)
    }
}

fn mismatch(carrier: &Carrier) -> StegoError {
    let expected = match carrier {
        Carrier::Pixels(_) => "per-channel bit positions",
        Carrier::Samples(_) => "an LSB count",
    };
    StegoError::InvalidBitSelection(format!(
        "{} carrier needs {}",
        carrier.kind(),
        expected
    ))
}
