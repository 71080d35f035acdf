//! Bit selections: which bits of a carrier element may hold payload.

use std::fmt;

use super::error::{Result, StegoError};

/// Set of bit positions (0-7) within one 8-bit channel, stored as a mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BitPositions(u8);

impl BitPositions {
    pub const EMPTY: Self = Self(0);

    /// Builds a set from a list of positions.
    ///
    /// Every position must be in `0..=7` and appear at most once.
    pub fn from_positions(positions: &[u8]) -> Result<Self> {
        let mut mask = 0u8;
        for &pos in positions {
            if pos > 7 {
                return Err(StegoError::InvalidBitSelection(format!(
                    "bit position {} is outside 0..=7",
                    pos
                )));
            }
            let bit = 1u8 << pos;
            if mask & bit != 0 {
                return Err(StegoError::InvalidBitSelection(format!(
                    "bit position {} is listed twice",
                    pos
                )));
            }
            mask |= bit;
        }
        Ok(Self(mask))
    }

    pub fn from_mask(mask: u8) -> Self {
        Self(mask)
    }

    pub fn mask(&self) -> u8 {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, pos: u8) -> bool {
        pos < 8 && self.0 & (1 << pos) != 0
    }

    /// Positions in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..8u8).filter(move |&p| self.contains(p))
    }
}

impl fmt::Display for BitPositions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let positions: Vec<String> = self.iter().map(|p| p.to_string()).collect();
        write!(f, "[{}]", positions.join(","))
    }
}

/// Per-channel bit positions for pixel carriers, in channel order (R, G, B, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelBitSelection {
    channels: Vec<BitPositions>,
}

impl PixelBitSelection {
    pub fn new(channels: Vec<BitPositions>) -> Self {
        Self { channels }
    }

    /// Convenience constructor for the usual red/green/blue selection.
    pub fn rgb(r: &[u8], g: &[u8], b: &[u8]) -> Result<Self> {
        Ok(Self::new(vec![
            BitPositions::from_positions(r)?,
            BitPositions::from_positions(g)?,
            BitPositions::from_positions(b)?,
        ]))
    }

    pub fn channels(&self) -> &[BitPositions] {
        &self.channels
    }

    /// Number of slots each pixel contributes.
    pub fn bits_per_pixel(&self) -> usize {
        self.channels.iter().map(BitPositions::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits_per_pixel() == 0
    }
}

/// Number of low bits used per audio sample, always in `1..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LsbCount(u8);

impl LsbCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub fn new(count: u8) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&count) {
            Ok(Self(count))
        } else {
            Err(StegoError::InvalidBitCount(count))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}

/// Bit selection matching one of the carrier shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitSelection {
    Pixel(PixelBitSelection),
    Sample(LsbCount),
}

impl From<PixelBitSelection> for BitSelection {
    fn from(selection: PixelBitSelection) -> Self {
        Self::Pixel(selection)
    }
}

impl From<LsbCount> for BitSelection {
    fn from(count: LsbCount) -> Self {
        Self::Sample(count)
    }
}
