//! Member type references.
//!
//! A member's type is described by an atom (how values are laid out) and a
//! storage kind (what each value is), plus a 16-bit extent that is the array
//! capacity for inline arrays and the bit width for bitfields.

use crate::error::DecodeError;

/// Layout shape of a member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Atom {
    /// A single value.
    Plain = 0,
    /// Out-of-line array: pointer plus count, data lives elsewhere.
    Array = 1,
    /// Fixed-capacity array embedded in the record.
    InlineArray = 2,
    /// Integer bitfield; extent is the bit width.
    Bitfield = 3,
}

impl Atom {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Plain),
            1 => Some(Self::Array),
            2 => Some(Self::InlineArray),
            3 => Some(Self::Bitfield),
            _ => None,
        }
    }
}

/// Storage kind of each value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Storage {
    I8 = 0,
    U8 = 1,
    I16 = 2,
    U16 = 3,
    I32 = 4,
    U32 = 5,
    I64 = 6,
    U64 = 7,
    F32 = 8,
    F64 = 9,
    EnumI8 = 10,
    EnumU8 = 11,
    EnumI16 = 12,
    EnumU16 = 13,
    EnumI32 = 14,
    EnumU32 = 15,
    EnumI64 = 16,
    EnumU64 = 17,
    String = 18,
    Pointer = 19,
    Struct = 20,
}

impl Storage {
    pub fn from_u8(v: u8) -> Option<Self> {
        Some(match v {
            0 => Self::I8,
            1 => Self::U8,
            2 => Self::I16,
            3 => Self::U16,
            4 => Self::I32,
            5 => Self::U32,
            6 => Self::I64,
            7 => Self::U64,
            8 => Self::F32,
            9 => Self::F64,
            10 => Self::EnumI8,
            11 => Self::EnumU8,
            12 => Self::EnumI16,
            13 => Self::EnumU16,
            14 => Self::EnumI32,
            15 => Self::EnumU32,
            16 => Self::EnumI64,
            17 => Self::EnumU64,
            18 => Self::String,
            19 => Self::Pointer,
            20 => Self::Struct,
            _ => return None,
        })
    }

    /// Whether values are integers backed by an enum.
    pub fn is_enum(self) -> bool {
        (Self::EnumI8 as u8..=Self::EnumU64 as u8).contains(&(self as u8))
    }

    /// Integer kind backing an enum storage; other kinds map to themselves.
    pub fn underlying(self) -> Self {
        match self {
            Self::EnumI8 => Self::I8,
            Self::EnumU8 => Self::U8,
            Self::EnumI16 => Self::I16,
            Self::EnumU16 => Self::U16,
            Self::EnumI32 => Self::I32,
            Self::EnumU32 => Self::U32,
            Self::EnumI64 => Self::I64,
            Self::EnumU64 => Self::U64,
            other => other,
        }
    }

    /// Whether values are integers (plain or enum-backed).
    pub fn is_integer(self) -> bool {
        (self as u8) <= Self::U64 as u8 || self.is_enum()
    }

    /// Whether values live outside the record (string or pointer).
    pub fn is_indirect(self) -> bool {
        matches!(self, Self::String | Self::Pointer)
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            Self::I8
                | Self::I16
                | Self::I32
                | Self::I64
                | Self::EnumI8
                | Self::EnumI16
                | Self::EnumI32
                | Self::EnumI64
        )
    }

    /// Byte width of fixed-size scalar kinds.
    ///
    /// `None` for pointer-sized and struct storage, whose size depends on the
    /// target or the referenced type.
    pub fn scalar_size(self) -> Option<usize> {
        match self {
            Self::I8 | Self::U8 | Self::EnumI8 | Self::EnumU8 => Some(1),
            Self::I16 | Self::U16 | Self::EnumI16 | Self::EnumU16 => Some(2),
            Self::I32 | Self::U32 | Self::EnumI32 | Self::EnumU32 | Self::F32 => Some(4),
            Self::I64 | Self::U64 | Self::EnumI64 | Self::EnumU64 | Self::F64 => Some(8),
            Self::String | Self::Pointer | Self::Struct => None,
        }
    }

    /// Short display name for primitive kinds.
    pub fn primitive_name(self) -> Option<&'static str> {
        match self {
            Self::I8 => Some("i8"),
            Self::U8 => Some("u8"),
            Self::I16 => Some("i16"),
            Self::U16 => Some("u16"),
            Self::I32 => Some("i32"),
            Self::U32 => Some("u32"),
            Self::I64 => Some("i64"),
            Self::U64 => Some("u64"),
            Self::F32 => Some("f32"),
            Self::F64 => Some("f64"),
            Self::String => Some("string"),
            Self::Pointer => Some("ptr"),
            _ => None,
        }
    }
}

/// Decoded type reference of a member.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TypeRef {
    pub atom: Atom,
    pub storage: Storage,
    /// Array capacity (InlineArray) or bit width (Bitfield); unused otherwise.
    pub extent: u16,
}

impl TypeRef {
    pub fn new(atom: Atom, storage: Storage, extent: u16) -> Self {
        Self {
            atom,
            storage,
            extent,
        }
    }

    /// Decode from the raw `(atom, storage, extent)` triple.
    pub fn from_raw(atom: u8, storage: u8, extent: u16) -> Result<Self, DecodeError> {
        Ok(Self {
            atom: Atom::from_u8(atom).ok_or(DecodeError::InvalidAtom(atom))?,
            storage: Storage::from_u8(storage).ok_or(DecodeError::InvalidStorage(storage))?,
            extent,
        })
    }

    pub fn is_inline_struct_array(&self) -> bool {
        self.atom == Atom::InlineArray && self.storage == Storage::Struct
    }

    /// Capacity of an inline array.
    pub fn array_len(&self) -> Option<u16> {
        (self.atom == Atom::InlineArray).then_some(self.extent)
    }

    /// Width of a bitfield in bits.
    pub fn bit_width(&self) -> Option<u16> {
        (self.atom == Atom::Bitfield).then_some(self.extent)
    }
}
