//! Payload frame construction and parsing.
//!
//! The frame is the self-describing container written into the slot stream:
//!
//! ```text
//! [4 bytes] payload length (big-endian u32)
//! [4 bytes] CRC-32 over the length bytes followed by the payload (big-endian)
//! [N bytes] payload
//! ```
//!
//! Every byte is emitted most-significant bit first. Because the checksum also
//! covers the length field, the frame of an empty payload carries a non-zero
//! checksum, so a carrier whose selected bits are all zero never decodes as a
//! valid empty message.

use std::borrow::Cow;

use serde::Serialize;

use super::error::{Result, StegoError};

/// Size of the length + checksum header in bytes.
pub const HEADER_LEN: usize = 8;

/// Size of the header in bits.
pub const HEADER_BITS: usize = HEADER_LEN * 8;

/// Outcome of a decode.
///
/// `found == false` is the normal answer for a carrier that holds no frame for
/// the given key and selection. It is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodeResult {
    pub found: bool,
    pub decoded: Option<Vec<u8>>,
}

impl DecodeResult {
    pub fn found(payload: Vec<u8>) -> Self {
        Self {
            found: true,
            decoded: Some(payload),
        }
    }

    pub fn not_found() -> Self {
        Self {
            found: false,
            decoded: None,
        }
    }

    /// The recovered payload bytes, if any.
    pub fn payload(&self) -> Option<&[u8]> {
        self.decoded.as_deref()
    }

    /// The recovered payload as text (invalid UTF-8 is replaced).
    pub fn text(&self) -> Option<Cow<'_, str>> {
        self.decoded.as_deref().map(String::from_utf8_lossy)
    }
}

/// Integrity value stored in the header.
pub fn checksum(payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&(payload.len() as u32).to_be_bytes());
    hasher.update(payload);
    hasher.finalize()
}

/// Number of slots a frame for `payload_len` bytes occupies.
pub fn framed_bit_len(payload_len: usize) -> u64 {
    (HEADER_LEN as u64 + payload_len as u64) * 8
}

/// Largest payload (in bytes) that fits in `budget` slots.
pub fn max_payload_len(budget: usize) -> usize {
    budget.saturating_sub(HEADER_BITS) / 8
}

/// Builds the frame for `payload` and returns it as a bit stream.
///
/// # Errors
/// [`StegoError::PayloadTooLarge`] when the payload length does not fit the
/// 32-bit length field.
pub fn frame(payload: &[u8]) -> Result<FrameBits> {
    let len = u32::try_from(payload.len()).map_err(|_| StegoError::PayloadTooLarge {
        needed: framed_bit_len(payload.len()),
        available: framed_bit_len(u32::MAX as usize),
    })?;

    let mut bytes = Vec::with_capacity(HEADER_LEN + payload.len());
    bytes.extend_from_slice(&len.to_be_bytes());
    bytes.extend_from_slice(&checksum(payload).to_be_bytes());
    bytes.extend_from_slice(payload);

    Ok(FrameBits { bytes, pos: 0 })
}

/// Bits of a frame, MSB first within each byte.
#[derive(Debug, Clone)]
pub struct FrameBits {
    bytes: Vec<u8>,
    pos: usize,
}

impl FrameBits {
    /// Total bit length of the frame.
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8
    }

    /// The frame as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Iterator for FrameBits {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let byte = *self.bytes.get(self.pos / 8)?;
        let bit = (byte >> (7 - self.pos % 8)) & 1 == 1;
        self.pos += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bit_len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FrameBits {}

/// Reads a frame from a bit stream holding at most `budget` bits.
///
/// The header is read first; a declared length that cannot fit in what is left
/// of the budget ends the decode before any body allocation. A stream that
/// runs dry early or a checksum mismatch also yield `found == false`.
pub fn unframe<I>(bits: I, budget: usize) -> DecodeResult
where
    I: IntoIterator<Item = bool>,
{
    if budget < HEADER_BITS {
        return DecodeResult::not_found();
    }

    let mut bits = bits.into_iter();

    let (len, expected) = match (read_u32(&mut bits), read_u32(&mut bits)) {
        (Some(len), Some(crc)) => (len, crc),
        _ => return DecodeResult::not_found(),
    };

    let remaining = (budget - HEADER_BITS) as u64;
    if len as u64 * 8 > remaining {
        return DecodeResult::not_found();
    }

    let mut body = Vec::with_capacity(len as usize);
    for _ in 0..len {
        match read_byte(&mut bits) {
            Some(byte) => body.push(byte),
            None => return DecodeResult::not_found(),
        }
    }

    if checksum(&body) != expected {
        return DecodeResult::not_found();
    }

    DecodeResult::found(body)
}

fn read_byte<I: Iterator<Item = bool>>(bits: &mut I) -> Option<u8> {
    let mut byte = 0u8;
    for _ in 0..8 {
        byte = (byte << 1) | bits.next()? as u8;
    }
    Some(byte)
}

fn read_u32<I: Iterator<Item = bool>>(bits: &mut I) -> Option<u32> {
    let mut bytes = [0u8; 4];
    for b in bytes.iter_mut() {
        *b = read_byte(bits)?;
    }
    Some(u32::from_be_bytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits_of(bytes: &[u8]) -> Vec<bool> {
        bytes
            .iter()
            .flat_map(|b| (0..8).rev().map(move |i| (b >> i) & 1 == 1))
            .collect()
    }

    #[test]
    fn test_frame_layout() {
        let framed = frame(b"hi").unwrap();
        let bytes = framed.as_bytes();

        assert_eq!(&bytes[0..4], &[0, 0, 0, 2]);
        assert_eq!(&bytes[4..8], &checksum(b"hi").to_be_bytes());
        assert_eq!(&bytes[8..], b"hi");
        assert_eq!(framed.bit_len(), 80);
    }

    #[test]
    fn test_bits_msb_first() {
        let bits: Vec<bool> = frame(b"\x80").unwrap().skip(HEADER_BITS).collect();
        assert_eq!(bits, vec![true, false, false, false, false, false, false, false]);
    }

    #[test]
    fn test_unframe_roundtrip() {
        let payload = b"Hello, steganography!";
        let bits: Vec<bool> = frame(payload).unwrap().collect();
        let budget = bits.len();

        let result = unframe(bits, budget);
        assert!(result.found);
        assert_eq!(result.payload(), Some(&payload[..]));
    }

    #[test]
    fn test_unframe_ignores_trailing_bits() {
        let mut bits: Vec<bool> = frame(b"abc").unwrap().collect();
        bits.extend(std::iter::repeat(true).take(200));
        let budget = bits.len();

        let result = unframe(bits, budget);
        assert_eq!(result, DecodeResult::found(b"abc".to_vec()));
    }

    #[test]
    fn test_empty_payload_roundtrip() {
        let bits: Vec<bool> = frame(b"").unwrap().collect();
        assert_eq!(bits.len(), HEADER_BITS);

        let result = unframe(bits, HEADER_BITS);
        assert!(result.found);
        assert_eq!(result.text().as_deref(), Some(""));
    }

    #[test]
    fn test_empty_checksum_is_not_zero() {
        assert_ne!(checksum(b""), 0);
    }

    #[test]
    fn test_all_zero_bits_not_found() {
        let result = unframe(vec![false; 4096], 4096);
        assert_eq!(result, DecodeResult::not_found());
    }

    #[test]
    fn test_all_one_bits_not_found() {
        let result = unframe(vec![true; 4096], 4096);
        assert!(!result.found);
    }

    #[test]
    fn test_budget_below_header() {
        let bits: Vec<bool> = frame(b"").unwrap().collect();
        assert!(!unframe(bits, HEADER_BITS - 1).found);
    }

    #[test]
    fn test_length_exceeding_budget_rejected() {
        let payload = [7u8; 16];
        let bits: Vec<bool> = frame(&payload).unwrap().collect();
        let needed = bits.len();

        assert!(unframe(bits.clone(), needed).found);
        assert!(!unframe(bits, needed - 1).found);
    }

    #[test]
    fn test_huge_declared_length_rejected_without_reading_body() {
        let mut header = Vec::new();
        header.extend_from_slice(&u32::MAX.to_be_bytes());
        header.extend_from_slice(&0u32.to_be_bytes());
        let bits = bits_of(&header);

        assert!(!unframe(bits, 1 << 20).found);
    }

    #[test]
    fn test_truncated_stream() {
        let bits: Vec<bool> = frame(b"truncated").unwrap().collect();
        let short: Vec<bool> = bits[..bits.len() - 3].to_vec();
        // Budget claims the full frame but the stream ends early.
        assert!(!unframe(short, bits.len()).found);
    }

    #[test]
    fn test_corrupted_body_rejected() {
        let mut bits: Vec<bool> = frame(b"integrity").unwrap().collect();
        let last = bits.len() - 1;
        bits[last] = !bits[last];
        let budget = bits.len();

        assert!(!unframe(bits, budget).found);
    }

    #[test]
    fn test_framed_bit_len() {
        assert_eq!(framed_bit_len(0), 64);
        assert_eq!(framed_bit_len(10), 144);
        assert_eq!(max_payload_len(144), 10);
        assert_eq!(max_payload_len(151), 10);
        assert_eq!(max_payload_len(63), 0);
    }

    #[test]
    fn test_text_is_lossy() {
        let result = DecodeResult::found(vec![0x66, 0xff, 0x6f]);
        assert_eq!(result.text().unwrap(), "f\u{fffd}o");
    }

    #[test]
    fn test_decode_result_json() {
        let json = serde_json::to_value(DecodeResult::found(b"hi".to_vec())).unwrap();
        assert_eq!(json, serde_json::json!({"found": true, "decoded": [104, 105]}));

        let json = serde_json::to_value(DecodeResult::not_found()).unwrap();
        assert_eq!(json, serde_json::json!({"found": false, "decoded": null}));
    }
}
