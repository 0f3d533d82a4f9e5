//! Format constants.

/// Magic bytes identifying a type library schema blob.
pub const SCHEMA_MAGIC: [u8; 4] = *b"TLIB";

/// Schema format version written by current toolchains.
pub const SCHEMA_VERSION: u32 = 1;

/// Magic bytes of a component instance header.
pub const INSTANCE_MAGIC: [u8; 4] = *b"INST";

/// Default-value offset meaning "no default".
pub const NO_DEFAULT: u32 = 0xFFFF_FFFF;

/// Schema header size in bytes.
pub const SCHEMA_HEADER_SIZE: usize = 36;

/// Instance header size in bytes.
pub const INSTANCE_HEADER_SIZE: usize = 28;

/// Byte offset of the type hash inside an instance header.
pub const INSTANCE_TYPE_HASH_OFFSET: usize = 12;

/// Bytes of a sparse index entry that carry data (hash + slot).
pub const INDEX_ENTRY_MIN_SIZE: usize = 8;

/// Type descriptor flag bits.
pub mod type_flags {
    pub const HAS_SUBDATA: u32 = 1 << 0;
    pub const EXTERNAL: u32 = 1 << 1;
    pub const UNION: u32 = 1 << 2;
    pub const VERIFY_SIZE: u32 = 1 << 3;
}
