//! Raw descriptor records as stored in the schema blob.
//!
//! These mirror the on-disk layout one-to-one. Width-dependent fields keep
//! both encodings; the catalog parser selects one.

use typelib_core::WidthValue;

use crate::error::DecodeError;
use crate::reader::ByteReader;

/// Type descriptor record (36 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawType {
    pub name_offset: u32,
    pub flags: u32,
    pub size: WidthValue,
    pub alignment: WidthValue,
    pub member_count: u32,
    pub member_start: u32,
    pub comment_offset: u32,
}

impl RawType {
    pub const SIZE: usize = 36;

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            name_offset: r.read_u32("type name offset")?,
            flags: r.read_u32("type flags")?,
            size: r.read_width("type size")?,
            alignment: r.read_width("type alignment")?,
            member_count: r.read_u32("type member count")?,
            member_start: r.read_u32("type member start")?,
            comment_offset: r.read_u32("type comment offset")?,
        })
    }
}

/// Member descriptor record (52 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawMember {
    pub name_offset: u32,
    pub comment_offset: u32,
    pub atom: u8,
    pub storage: u8,
    /// Bit width (bitfields) or capacity (inline arrays).
    pub extent: u16,
    pub ref_type_hash: u32,
    pub size: WidthValue,
    pub alignment: WidthValue,
    pub offset: WidthValue,
    /// Offset into the default-value pool, `NO_DEFAULT` if absent.
    pub default_offset: u32,
    pub default_size: u32,
    pub flags: u32,
}

impl RawMember {
    pub const SIZE: usize = 52;

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            name_offset: r.read_u32("member name offset")?,
            comment_offset: r.read_u32("member comment offset")?,
            atom: r.read_u8("member atom")?,
            storage: r.read_u8("member storage")?,
            extent: r.read_u16("member extent")?,
            ref_type_hash: r.read_u32("member referenced type")?,
            size: r.read_width("member size")?,
            alignment: r.read_width("member alignment")?,
            offset: r.read_width("member offset")?,
            default_offset: r.read_u32("member default offset")?,
            default_size: r.read_u32("member default size")?,
            flags: r.read_u32("member flags")?,
        })
    }
}

/// Enum descriptor record (24 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawEnum {
    pub name_offset: u32,
    pub comment_offset: u32,
    pub flags: u32,
    /// Backing storage code in the low byte.
    pub storage: u32,
    pub value_start: u32,
    pub value_count: u32,
}

impl RawEnum {
    pub const SIZE: usize = 24;

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            name_offset: r.read_u32("enum name offset")?,
            comment_offset: r.read_u32("enum comment offset")?,
            flags: r.read_u32("enum flags")?,
            storage: r.read_u32("enum storage")?,
            value_start: r.read_u32("enum value start")?,
            value_count: r.read_u32("enum value count")?,
        })
    }
}

/// Enum value record (24 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawEnumValue {
    pub comment_offset: u32,
    /// Alias index whose name is the value's display name.
    pub main_alias: u32,
    pub alias_start: u32,
    pub alias_count: u32,
    pub value: u64,
}

impl RawEnumValue {
    pub const SIZE: usize = 24;

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            comment_offset: r.read_u32("enum value comment offset")?,
            main_alias: r.read_u32("enum value main alias")?,
            alias_start: r.read_u32("enum value alias start")?,
            alias_count: r.read_u32("enum value alias count")?,
            value: r.read_u64("enum value")?,
        })
    }
}

/// Enum alias record (4 bytes).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawEnumAlias {
    pub name_offset: u32,
}

impl RawEnumAlias {
    pub const SIZE: usize = 4;

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            name_offset: r.read_u32("enum alias name offset")?,
        })
    }
}

/// Read `count` records, checking the span before allocating.
pub(crate) fn read_records<T>(
    r: &mut ByteReader<'_>,
    count: u32,
    size: usize,
    what: &'static str,
    read: fn(&mut ByteReader<'_>) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    let count = count as usize;
    r.ensure(count, size, what)?;
    (0..count).map(|_| read(r)).collect()
}
