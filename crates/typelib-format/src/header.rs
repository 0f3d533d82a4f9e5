//! Schema blob header (36 bytes).
//!
//! Layout:
//! - 0-7: identity (magic, version)
//! - 8-27: element counts (5 × u32), in section order
//! - 28-35: pool sizes (default values, strings)
//!
//! Section order after the header: TypeNameHashes → EnumNameHashes →
//! TypeRecords → EnumRecords → MemberRecords → EnumValueRecords →
//! EnumAliasRecords → DefaultPool → StringPool

use crate::constants::{SCHEMA_MAGIC, SCHEMA_VERSION};
use crate::error::DecodeError;
use crate::reader::ByteReader;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SchemaHeader {
    /// Magic bytes: b"TLIB"
    pub magic: [u8; 4],
    pub version: u32,

    pub type_count: u32,
    pub enum_count: u32,
    pub member_count: u32,
    pub enum_value_count: u32,
    pub enum_alias_count: u32,

    /// Size of the default-value pool in bytes.
    pub default_pool_size: u32,
    /// Size of the string pool in bytes.
    pub string_pool_size: u32,
}

impl Default for SchemaHeader {
    fn default() -> Self {
        Self {
            magic: SCHEMA_MAGIC,
            version: SCHEMA_VERSION,
            type_count: 0,
            enum_count: 0,
            member_count: 0,
            enum_value_count: 0,
            enum_alias_count: 0,
            default_pool_size: 0,
            string_pool_size: 0,
        }
    }
}

impl SchemaHeader {
    /// Decode the header, rejecting a wrong magic.
    ///
    /// The version is recorded but not checked.
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let magic = r.read_array::<4>("schema magic")?;
        if magic != SCHEMA_MAGIC {
            return Err(DecodeError::InvalidMagic {
                expected: SCHEMA_MAGIC,
                found: magic,
            });
        }

        Ok(Self {
            magic,
            version: r.read_u32("schema version")?,
            type_count: r.read_u32("type count")?,
            enum_count: r.read_u32("enum count")?,
            member_count: r.read_u32("member count")?,
            enum_value_count: r.read_u32("enum value count")?,
            enum_alias_count: r.read_u32("enum alias count")?,
            default_pool_size: r.read_u32("default pool size")?,
            string_pool_size: r.read_u32("string pool size")?,
        })
    }

    pub fn validate_version(&self) -> bool {
        self.version == SCHEMA_VERSION
    }

    /// Encode to 36 bytes.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn to_bytes(&self) -> [u8; crate::constants::SCHEMA_HEADER_SIZE] {
        let mut bytes = [0u8; crate::constants::SCHEMA_HEADER_SIZE];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.type_count.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.enum_count.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.member_count.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.enum_value_count.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.enum_alias_count.to_le_bytes());
        bytes[28..32].copy_from_slice(&self.default_pool_size.to_le_bytes());
        bytes[32..36].copy_from_slice(&self.string_pool_size.to_le_bytes());
        bytes
    }
}
