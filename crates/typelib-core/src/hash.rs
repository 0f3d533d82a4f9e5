//! Symbol name hashing.
//!
//! Every type, enum and resource in the format is keyed by a 32-bit hash of
//! its source symbol name. The hash is a djb2 variant offset so that the empty
//! string hashes to zero, which the format uses as the "unset" sentinel.

use std::fmt;

/// Initial accumulator of the djb2 fold.
pub const HASH_SEED: u32 = 5381;

/// Hash a symbol name.
///
/// `acc = acc * 33 + byte` starting at [`HASH_SEED`], minus the seed, all in
/// wrapping 32-bit arithmetic. Must stay bit-exact with the hashes baked into
/// shipped schemas.
pub fn hash(name: &str) -> NameHash {
    let acc = name
        .bytes()
        .fold(HASH_SEED, |acc, b| acc.wrapping_mul(33).wrapping_add(b as u32));
    NameHash(acc.wrapping_sub(HASH_SEED))
}

/// 32-bit hash of a symbol name.
///
/// `NameHash(0)` is the hash of the empty string and means "absent".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, serde::Serialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct NameHash(pub u32);

impl NameHash {
    pub const UNSET: Self = Self(0);

    /// Hash a symbol name. Same as [`hash`].
    #[inline]
    pub fn of(name: &str) -> Self {
        hash(name)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn is_unset(self) -> bool {
        self.0 == 0
    }

    /// Little-endian byte pattern as it appears in blobs.
    #[inline]
    pub fn to_le_bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Parse `0x`-prefixed hex, or hash the text as a symbol name otherwise.
    pub fn parse_or_hash(text: &str) -> Self {
        text.strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .map(Self)
            .unwrap_or_else(|| hash(text))
    }
}

impl From<u32> for NameHash {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for NameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

impl fmt::Debug for NameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameHash(0x{:08X})", self.0)
    }
}
