//! Error types for the LSB codec.
//!
//! Every variant describes a malformed *input* to the codec. A decode that
//! runs but finds nothing is not an error: it is reported through
//! [`DecodeResult::found`](super::DecodeResult) instead.

use thiserror::Error;

/// Errors that can occur while preparing or running an encode/decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    #[error("Invalid bit selection: {0}")]
    InvalidBitSelection(String),

    #[error("Invalid LSB count {0}: must be between 1 and 7")]
    InvalidBitCount(u8),

    #[error("Slot domain is empty: the carrier has no selected bits")]
    InvalidDomain,

    #[error("Unknown generator strategy '{0}'")]
    UnknownStrategy(String),

    #[error("Payload too large: frame needs {needed} bits, carrier has {available} slots")]
    PayloadTooLarge { needed: u64, available: u64 },

    #[error("Carrier too large: {slots} slots exceeds the limit of {limit}")]
    CarrierTooLarge { slots: u64, limit: u64 },

    #[error("Invalid carrier: {0}")]
    InvalidCarrier(String),
}

/// Convenience result alias for codec operations.
pub type Result<T> = std::result::Result<T, StegoError>;
