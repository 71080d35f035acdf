//! Slot-to-bit mapping for each carrier shape.
//!
//! A codec turns an abstract slot index into a concrete bit inside a carrier
//! and reads or writes that single bit. The slot enumeration is part of the
//! wire contract: encoder and decoder must enumerate identically.
//!
//! Pixel carriers: pixels in raster order, then channels in declared order,
//! then selected bit positions ascending.
//!
//! Sample carriers: samples in order, then bit positions `0..lsb_count`.

use super::carrier::{PixelGrid, SampleStream};
use super::error::{Result, StegoError};
use super::selection::{LsbCount, PixelBitSelection};

/// Reads and writes single payload bits of a carrier.
pub trait ChannelCodec {
    type Carrier;

    /// Number of addressable slots.
    fn domain_size(&self) -> usize;

    fn read_bit(&self, carrier: &Self::Carrier, slot: usize) -> bool;

    /// Replaces one bit, leaving every other bit of the element untouched.
    fn write_bit(&self, carrier: &mut Self::Carrier, slot: usize, bit: bool);
}

/// Codec for [`PixelGrid`] carriers with a per-channel bit selection.
#[derive(Debug, Clone)]
pub struct PixelChannelCodec {
    channels: usize,
    pixels: usize,
    /// `(channel, bit)` pairs contributed by each pixel, in slot order.
    layout: Vec<(u8, u8)>,
}

impl PixelChannelCodec {
    /// Builds the codec for `grid`.
    ///
    /// # Errors
    /// [`StegoError::InvalidBitSelection`] when the selection uses a channel
    /// the grid does not have.
    pub fn new(grid: &PixelGrid, selection: &PixelBitSelection) -> Result<Self> {
        let mut layout = Vec::with_capacity(selection.bits_per_pixel());
        for (channel, positions) in selection.channels().iter().enumerate() {
            if positions.is_empty() {
                continue;
            }
            if channel >= grid.channels() as usize {
                return Err(StegoError::InvalidBitSelection(format!(
                    "channel {} selected but the image has {} channels",
                    channel,
                    grid.channels()
                )));
            }
            layout.extend(positions.iter().map(|bit| (channel as u8, bit)));
        }

        Ok(Self {
            channels: grid.channels() as usize,
            pixels: grid.pixel_count(),
            layout,
        })
    }

    fn locate(&self, slot: usize) -> (usize, u8) {
        let per_pixel = self.layout.len();
        let pixel = slot / per_pixel;
        let (channel, bit) = self.layout[slot % per_pixel];
        (pixel * self.channels + channel as usize, bit)
    }
}

impl ChannelCodec for PixelChannelCodec {
    type Carrier = PixelGrid;

    fn domain_size(&self) -> usize {
        self.pixels.saturating_mul(self.layout.len())
    }

    fn read_bit(&self, carrier: &PixelGrid, slot: usize) -> bool {
        let (offset, bit) = self.locate(slot);
        (carrier.as_bytes()[offset] >> bit) & 1 == 1
    }

    fn write_bit(&self, carrier: &mut PixelGrid, slot: usize, bit: bool) {
        let (offset, pos) = self.locate(slot);
        let byte = &mut carrier.as_bytes_mut()[offset];
        *byte = (*byte & !(1 << pos)) | ((bit as u8) << pos);
    }
}

/// Codec for [`SampleStream`] carriers using the low `lsb_count` bits.
#[derive(Debug, Clone)]
pub struct SampleChannelCodec {
    samples: usize,
    lsb_count: u8,
}

impl SampleChannelCodec {
    pub fn new(stream: &SampleStream, lsb_count: LsbCount) -> Result<Self> {
        if lsb_count.get() >= stream.sample_bits() {
            return Err(StegoError::InvalidBitCount(lsb_count.get()));
        }
        Ok(Self {
            samples: stream.len(),
            lsb_count: lsb_count.get(),
        })
    }

    fn locate(&self, slot: usize) -> (usize, u8) {
        let per_sample = self.lsb_count as usize;
        (slot / per_sample, (slot % per_sample) as u8)
    }
}

impl ChannelCodec for SampleChannelCodec {
    type Carrier = SampleStream;

    fn domain_size(&self) -> usize {
        self.samples.saturating_mul(self.lsb_count as usize)
    }

    fn read_bit(&self, carrier: &SampleStream, slot: usize) -> bool {
        let (index, pos) = self.locate(slot);
        carrier.bit(index, pos)
    }

    fn write_bit(&self, carrier: &mut SampleStream, slot: usize, bit: bool) {
        let (index, pos) = self.locate(slot);
        carrier.set_bit(index, pos, bit);
    }
}
