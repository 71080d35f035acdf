//! # lsbhide - keyed LSB steganography
//!
//! Hides payloads in the least significant bits of raw image pixels or PCM
//! audio samples, and recovers them.
//!
//! ## Overview
//!
//! - A **carrier** is a decoded pixel grid or sample stream
//! - A **bit selection** says which bits may change: per-channel bit
//!   positions for images, a low-bit count for audio
//! - Every selected bit is a **slot**; a **generator** orders the slots,
//!   either linearly or as a permutation seeded by a secret key
//! - The payload is wrapped in a **frame** (`[u32 length][u32 CRC-32][bytes]`)
//!   and written bit by bit in slot order
//!
//! Decoding never guesses: without the right key and selection the frame
//! check fails and the result is `found == false`, not an error.
//!
//! ## Example
//!
//! ```rust
//! use lsbhide::{BitSelection, Carrier, GeneratorSpec, PixelBitSelection, PixelGrid, StegoEngine};
//!
//! let carrier: Carrier = PixelGrid::zeroed(64, 64, 3).unwrap().into();
//! let selection: BitSelection = PixelBitSelection::rgb(&[0], &[0], &[0, 1]).unwrap().into();
//! let generator = GeneratorSpec::keyed("correct horse");
//!
//! let engine = StegoEngine::default();
//! let hidden = engine.encode(&carrier, &generator, &selection, b"meet at noon").unwrap();
//!
//! let result = engine.decode(&hidden, &generator, &selection).unwrap();
//! assert!(result.found);
//! assert_eq!(result.payload(), Some(&b"meet at noon"[..]));
//!
//! let wrong = engine.decode(&hidden, &GeneratorSpec::keyed("wrong"), &selection).unwrap();
//! assert!(!wrong.found);
//! ```
//!
//! ## Modules
//!
//! - [`stego`]: the codec (generator, frame, channel codecs, engine)
//! - [`request`]: form-parameter validation and JSON responses for the web layer
//! - [`media`]: PNG/BMP/WAV loading and saving

pub mod media;
pub mod request;
pub mod stego;

pub use media::{LoadedCarrier, MediaError, MediaKind};
pub use request::{handle_decode, handle_encode, DecodeResponse, RequestError, StegoParams};
pub use stego::{
    generate_order, BitPositions, BitSelection, CapacityReport, Carrier, DecodeResult,
    EngineConfig, GeneratorSpec, GeneratorStrategy, LsbCount, PixelBitSelection, PixelGrid,
    SampleStream, StegoEngine, StegoError,
};
