//! Raw carriers: decoded pixel grids and PCM sample streams.
//!
//! Container formats (PNG, WAV, ...) are decoded elsewhere; the codec only
//! sees the raw elements.

use super::error::{Result, StegoError};

/// Interleaved 8-bit pixel data in row-major order.
///
/// Element `(x, y, channel)` lives at `(y * width + x) * channels + channel`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelGrid {
    /// Wraps an existing buffer, checking it matches the declared shape.
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        if channels == 0 {
            return Err(StegoError::InvalidCarrier(
                "pixel grid needs at least one channel".to_string(),
            ));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels as usize))
            .ok_or_else(|| StegoError::InvalidCarrier("pixel grid dimensions overflow".to_string()))?;
        if data.len() != expected {
            return Err(StegoError::InvalidCarrier(format!(
                "{}x{}x{} grid needs {} bytes, got {}",
                width,
                height,
                channels,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// All-zero grid of the given shape.
    pub fn zeroed(width: u32, height: u32, channels: u8) -> Result<Self> {
        let len = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(channels as usize);
        Self::new(width, height, channels, vec![0; len])
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Integer sample types whose bit pattern can carry payload.
pub trait LsbSample: Copy {
    fn bit(self, pos: u8) -> bool;
    fn with_bit(self, pos: u8, bit: bool) -> Self;
}

macro_rules! impl_lsb_sample {
    ($($ty:ty => $bits:ty),* $(,)?) => {
        $(
            impl LsbSample for $ty {
                #[inline]
                fn bit(self, pos: u8) -> bool {
                    ((self as $bits) >> pos) & 1 == 1
                }

                #[inline]
                fn with_bit(self, pos: u8, bit: bool) -> Self {
                    let raw = self as $bits;
                    ((raw & !(1 << pos)) | ((bit as $bits) << pos)) as $ty
                }
            }
        )*
    };
}

impl_lsb_sample!(u8 => u8, i8 => u8, u16 => u16, i16 => u16);

/// Ordered PCM samples. Signed samples are addressed through their
/// two's-complement bit pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleStream {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
}

impl SampleStream {
    pub fn len(&self) -> usize {
        match self {
            Self::U8(s) => s.len(),
            Self::I8(s) => s.len(),
            Self::U16(s) => s.len(),
            Self::I16(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bit width of one sample.
    pub fn sample_bits(&self) -> u8 {
        match self {
            Self::U8(_) | Self::I8(_) => 8,
            Self::U16(_) | Self::I16(_) => 16,
        }
    }

    pub(crate) fn bit(&self, index: usize, pos: u8) -> bool {
        match self {
            Self::U8(s) => s[index].bit(pos),
            Self::I8(s) => s[index].bit(pos),
            Self::U16(s) => s[index].bit(pos),
            Self::I16(s) => s[index].bit(pos),
        }
    }

    pub(crate) fn set_bit(&mut self, index: usize, pos: u8, bit: bool) {
        match self {
            Self::U8(s) => s[index] = s[index].with_bit(pos, bit),
            Self::I8(s) => s[index] = s[index].with_bit(pos, bit),
            Self::U16(s) => s[index] = s[index].with_bit(pos, bit),
            Self::I16(s) => s[index] = s[index].with_bit(pos, bit),
        }
    }
}

/// Any supported carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Carrier {
    Pixels(PixelGrid),
    Samples(SampleStream),
}

impl Carrier {
    /// Short name of the carrier shape, for logs and reports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pixels(_) => "pixels",
            Self::Samples(_) => "samples",
        }
    }
}

impl From<PixelGrid> for Carrier {
    fn from(grid: PixelGrid) -> Self {
        Self::Pixels(grid)
    }
}

impl From<SampleStream> for Carrier {
    fn from(stream: SampleStream) -> Self {
        Self::Samples(stream)
    }
}
