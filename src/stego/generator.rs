//! Slot ordering strategies.
//!
//! A carrier exposes `n` addressable bit slots. The generator decides in which
//! order the encoder writes them and the decoder reads them back. Both sides
//! must produce the exact same order, so every strategy is a pure function of
//! `(strategy, key, n)`.
//!
//! # Keyed order
//!
//! The key is stretched into a 32-byte seed with HKDF-SHA256 and fed to a
//! ChaCha20 PRNG which drives a forward Fisher-Yates shuffle. The shuffle is
//! evaluated lazily: only the swaps touched so far are kept in a sparse table,
//! so reading a short frame from a huge carrier never materialises the whole
//! permutation.
//!
//! Ranges are drawn as `u32` so that native (64-bit) and WASM (32-bit) builds
//! consume the PRNG identically and agree on the permutation.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use hkdf::Hkdf;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use sha2::Sha256;

use super::error::{Result, StegoError};

/// HKDF salt for the keyed slot permutation.
pub const SALT_SLOTS: &[u8] = b"LSBHIDE-SLOTS-V1";

/// Largest domain the keyed shuffle can address.
pub const MAX_KEYED_DOMAIN: usize = u32::MAX as usize;

/// Slot traversal strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorStrategy {
    /// Identity order `0, 1, 2, ...`; the key is ignored.
    Linear,
    /// Key-seeded pseudo-random permutation.
    Keyed,
}

impl GeneratorStrategy {
    /// Name used on the wire (`generator_type`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Keyed => "keyed",
        }
    }
}

impl fmt::Display for GeneratorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneratorStrategy {
    type Err = StegoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "keyed" => Ok(Self::Keyed),
            _ => Err(StegoError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Strategy plus secret key. The domain size comes from the carrier.
#[derive(Clone, PartialEq, Eq)]
pub struct GeneratorSpec {
    pub strategy: GeneratorStrategy,
    pub key: Vec<u8>,
}

impl GeneratorSpec {
    pub fn new(strategy: GeneratorStrategy, key: impl AsRef<[u8]>) -> Self {
        Self {
            strategy,
            key: key.as_ref().to_vec(),
        }
    }

    pub fn linear() -> Self {
        Self::new(GeneratorStrategy::Linear, b"")
    }

    pub fn keyed(key: impl AsRef<[u8]>) -> Self {
        Self::new(GeneratorStrategy::Keyed, key)
    }

    /// Slot order over a domain of `domain_size` slots.
    pub fn order(&self, domain_size: usize) -> Result<SlotOrder> {
        generate_order(self.strategy, &self.key, domain_size)
    }
}

// Keep the key out of debug output.
impl fmt::Debug for GeneratorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorSpec")
            .field("strategy", &self.strategy)
            .field("key", &format_args!("<{} bytes>", self.key.len()))
            .finish()
    }
}

/// Produces the slot order for `(strategy, key, domain_size)`.
///
/// The returned iterator yields every index of `0..domain_size` exactly once.
/// Calling this twice with the same arguments yields identical sequences, and
/// cloning a fresh `SlotOrder` restarts it.
///
/// # Errors
/// - [`StegoError::InvalidDomain`] when `domain_size` is zero.
/// - [`StegoError::CarrierTooLarge`] when a keyed domain exceeds
///   [`MAX_KEYED_DOMAIN`].
pub fn generate_order(
    strategy: GeneratorStrategy,
    key: &[u8],
    domain_size: usize,
) -> Result<SlotOrder> {
    if domain_size == 0 {
        return Err(StegoError::InvalidDomain);
    }

    let inner = match strategy {
        GeneratorStrategy::Linear => OrderInner::Linear(0..domain_size),
        GeneratorStrategy::Keyed => {
            if domain_size > MAX_KEYED_DOMAIN {
                return Err(StegoError::CarrierTooLarge {
                    slots: domain_size as u64,
                    limit: MAX_KEYED_DOMAIN as u64,
                });
            }
            OrderInner::Keyed(KeyedShuffle::new(derive_seed(key), domain_size as u32))
        }
    };

    Ok(SlotOrder { inner })
}

/// Lazily produced slot order. See [`generate_order`].
#[derive(Clone)]
pub struct SlotOrder {
    inner: OrderInner,
}

#[derive(Clone)]
enum OrderInner {
    Linear(Range<usize>),
    Keyed(KeyedShuffle),
}

impl Iterator for SlotOrder {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match &mut self.inner {
            OrderInner::Linear(range) => range.next(),
            OrderInner::Keyed(shuffle) => shuffle.next().map(|slot| slot as usize),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.inner {
            OrderInner::Linear(range) => range.len(),
            OrderInner::Keyed(shuffle) => (shuffle.len - shuffle.pos) as usize,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SlotOrder {}

/// Forward Fisher-Yates over `0..len`, one output per step.
///
/// Step `i` draws `j` uniformly from `i..len`, emits the value currently at
/// `j` and moves the value at `i` into `j`. Positions that were never swapped
/// hold their own index, so only displaced entries are stored.
#[derive(Clone)]
struct KeyedShuffle {
    rng: ChaCha20Rng,
    len: u32,
    pos: u32,
    displaced: HashMap<u32, u32>,
}

impl KeyedShuffle {
    fn new(seed: [u8; 32], len: u32) -> Self {
        Self {
            rng: ChaCha20Rng::from_seed(seed),
            len,
            pos: 0,
            displaced: HashMap::new(),
        }
    }

    fn value_at(&self, index: u32) -> u32 {
        self.displaced.get(&index).copied().unwrap_or(index)
    }
}

impl Iterator for KeyedShuffle {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.pos >= self.len {
            return None;
        }

        let i = self.pos;
        let j = self.rng.gen_range(i..self.len);
        let picked = self.value_at(j);
        if j != i {
            let current = self.value_at(i);
            self.displaced.insert(j, current);
        }
        // Index i is never read again.
        self.displaced.remove(&i);
        self.pos += 1;

        Some(picked)
    }
}

/// Derives the 32-byte PRNG seed for a key using HKDF-SHA256.
fn derive_seed(key: &[u8]) -> [u8; 32] {
    let hk = Hkdf::<Sha256>::new(Some(SALT_SLOTS), key);
    let mut output = [0u8; 32];
    hk.expand(b"slot-order", &mut output)
        .expect("HKDF expand should not fail");
    output
}
