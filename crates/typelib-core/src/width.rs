//! Pointer-width dependent layout values.
//!
//! Schemas describe the same struct for 32-bit and 64-bit targets. Sizes,
//! alignments and offsets are stored as a pair; the reader picks one.

use std::fmt;

/// Target pointer width the schema is decoded for.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum PointerWidth {
    Bits32,
    #[default]
    Bits64,
}

impl PointerWidth {
    /// Pointer size in bytes.
    pub fn bytes(self) -> usize {
        match self {
            Self::Bits32 => 4,
            Self::Bits64 => 8,
        }
    }

    /// Decode the instance header pointer-width flag (0 = 32-bit, otherwise 64-bit).
    pub fn from_flag(flag: u8) -> Self {
        if flag == 0 { Self::Bits32 } else { Self::Bits64 }
    }

    pub fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            32 => Some(Self::Bits32),
            64 => Some(Self::Bits64),
            _ => None,
        }
    }
}

impl fmt::Display for PointerWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bits32 => f.write_str("32-bit"),
            Self::Bits64 => f.write_str("64-bit"),
        }
    }
}

/// Parallel 32-bit and 64-bit encodings of one layout quantity.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct WidthValue {
    pub value32: u32,
    pub value64: u32,
}

impl WidthValue {
    pub fn new(value32: u32, value64: u32) -> Self {
        Self { value32, value64 }
    }

    /// Same value on both targets.
    pub fn uniform(value: u32) -> Self {
        Self::new(value, value)
    }

    #[inline]
    pub fn select(self, width: PointerWidth) -> u32 {
        match width {
            PointerWidth::Bits32 => self.value32,
            PointerWidth::Bits64 => self.value64,
        }
    }
}
