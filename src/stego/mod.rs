//! LSB steganography codec.
//!
//! - [`generator`]: keyed / linear slot ordering
//! - [`frame`]: length-prefixed, checksummed payload frames
//! - [`codec`]: slot-to-bit mapping for pixel grids and sample streams
//! - [`engine`]: encode/decode orchestration

pub mod carrier;
pub mod codec;
pub mod engine;
pub mod error;
pub mod frame;
pub mod generator;
pub mod selection;

pub use carrier::{Carrier, LsbSample, PixelGrid, SampleStream};
pub use codec::{ChannelCodec, PixelChannelCodec, SampleChannelCodec};
pub use engine::{CapacityReport, EngineConfig, StegoEngine, DEFAULT_MAX_SLOTS};
pub use error::StegoError;
pub use frame::DecodeResult;
pub use generator::{generate_order, GeneratorSpec, GeneratorStrategy, SlotOrder};
pub use selection::{BitPositions, BitSelection, LsbCount, PixelBitSelection};
