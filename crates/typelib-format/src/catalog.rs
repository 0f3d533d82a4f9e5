//! Type library catalog.
//!
//! [`CatalogParser`] decodes a schema blob into a [`Catalog`] of type and enum
//! descriptors keyed by [`NameHash`]. Parsing either fully succeeds or fails;
//! no partial catalog is ever returned.

use std::collections::HashMap;
use std::ops::Range;

use typelib_core::{KnownNames, NameHash, PointerWidth};

use crate::constants::{NO_DEFAULT, type_flags};
use crate::error::DecodeError;
use crate::header::SchemaHeader;
use crate::reader::ByteReader;
use crate::records::{RawEnum, RawEnumAlias, RawEnumValue, RawMember, RawType, read_records};
use crate::type_ref::{Storage, TypeRef};

/// Type descriptor flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct TypeFlags(pub u32);

impl TypeFlags {
    pub fn has_subdata(self) -> bool {
        self.0 & type_flags::HAS_SUBDATA != 0
    }

    pub fn is_external(self) -> bool {
        self.0 & type_flags::EXTERNAL != 0
    }

    pub fn is_union(self) -> bool {
        self.0 & type_flags::UNION != 0
    }

    pub fn verify_size(self) -> bool {
        self.0 & type_flags::VERIFY_SIZE != 0
    }
}

/// A struct type described by the schema.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeDescriptor {
    pub hash: NameHash,
    pub name: String,
    pub flags: TypeFlags,
    pub size: u32,
    pub alignment: u32,
    pub members: Vec<MemberDescriptor>,
    pub comment: String,
}

impl TypeDescriptor {
    pub fn member(&self, name: &str) -> Option<&MemberDescriptor> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// A field of a [`TypeDescriptor`].
#[derive(Clone, Debug, PartialEq)]
pub struct MemberDescriptor {
    pub name: String,
    pub comment: String,
    pub type_ref: TypeRef,
    /// Referenced struct or enum type; unset for primitive storage.
    pub ref_type: NameHash,
    pub size: u32,
    pub alignment: u32,
    /// Byte offset inside the owning type.
    pub offset: u32,
    pub default: Option<Vec<u8>>,
    pub flags: u32,
}

impl MemberDescriptor {
    /// Byte range of this member inside a record of the owning type.
    pub fn byte_range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.size as usize
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EnumDescriptor {
    pub hash: NameHash,
    pub name: String,
    pub comment: String,
    pub flags: u32,
    /// Backing storage, usually one of the `Enum*` kinds.
    pub storage: Storage,
    pub values: Vec<EnumValueDescriptor>,
}

impl EnumDescriptor {
    /// First value equal to `value`.
    pub fn value_of(&self, value: i64) -> Option<&EnumValueDescriptor> {
        self.values.iter().find(|v| v.value == value)
    }

    pub fn by_name(&self, name: &str) -> Option<&EnumValueDescriptor> {
        self.values
            .iter()
            .find(|v| v.name == name || v.aliases.iter().any(|a| a == name))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumValueDescriptor {
    /// Display name, taken from the value's main alias.
    pub name: String,
    pub comment: String,
    pub value: i64,
    pub aliases: Vec<String>,
}

/// Decoded schema: types and enums keyed by name hash.
///
/// Immutable after parsing and safe to share across threads.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    version: u32,
    pointer_width: PointerWidth,
    types: HashMap<NameHash, TypeDescriptor>,
    enums: HashMap<NameHash, EnumDescriptor>,
}

impl Catalog {
    /// Parse without a name dictionary.
    pub fn parse(bytes: &[u8], width: PointerWidth) -> Result<Self, DecodeError> {
        CatalogParser::new(width).parse(bytes)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Pointer width the width-dependent fields were selected for.
    pub fn pointer_width(&self) -> PointerWidth {
        self.pointer_width
    }

    pub fn get_type(&self, hash: NameHash) -> Option<&TypeDescriptor> {
        self.types.get(&hash)
    }

    pub fn get_enum(&self, hash: NameHash) -> Option<&EnumDescriptor> {
        self.enums.get(&hash)
    }

    pub fn type_by_name(&self, name: &str) -> Option<&TypeDescriptor> {
        self.get_type(NameHash::of(name))
    }

    pub fn enum_by_name(&self, name: &str) -> Option<&EnumDescriptor> {
        self.get_enum(NameHash::of(name))
    }

    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumDescriptor> {
        self.enums.values()
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub fn enum_count(&self) -> usize {
        self.enums.len()
    }

    /// Display name of a referenced type or enum, falling back to the hash.
    pub fn name_of(&self, hash: NameHash) -> String {
        if let Some(t) = self.get_type(hash) {
            return t.name.clone();
        }
        if let Some(e) = self.get_enum(hash) {
            return e.name.clone();
        }
        hash.to_string()
    }
}

/// Builder-style parser configuration.
///
/// ```ignore
/// let catalog = CatalogParser::new(PointerWidth::Bits64)
///     .with_names(&names)
///     .parse(&schema)?;
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CatalogParser<'n> {
    width: PointerWidth,
    names: Option<&'n KnownNames>,
}

impl<'n> CatalogParser<'n> {
    pub fn new(width: PointerWidth) -> Self {
        Self { width, names: None }
    }

    /// Recover names through a well-known-name dictionary before the string pool.
    pub fn with_names(mut self, names: &'n KnownNames) -> Self {
        self.names = Some(names);
        self
    }

    pub fn parse(&self, bytes: &[u8]) -> Result<Catalog, DecodeError> {
        let mut r = ByteReader::new(bytes);
        let header = SchemaHeader::read(&mut r)?;
        if !header.validate_version() {
            tracing::debug!(
                version = header.version,
                "unrecognized schema version, decoding anyway"
            );
        }

        let type_hashes = r.read_u32_array(header.type_count as usize, "type name hashes")?;
        let enum_hashes = r.read_u32_array(header.enum_count as usize, "enum name hashes")?;
        let raw_types = read_records(
            &mut r,
            header.type_count,
            RawType::SIZE,
            "type records",
            RawType::read,
        )?;
        let raw_enums = read_records(
            &mut r,
            header.enum_count,
            RawEnum::SIZE,
            "enum records",
            RawEnum::read,
        )?;
        let raw_members = read_records(
            &mut r,
            header.member_count,
            RawMember::SIZE,
            "member records",
            RawMember::read,
        )?;
        let raw_values = read_records(
            &mut r,
            header.enum_value_count,
            RawEnumValue::SIZE,
            "enum value records",
            RawEnumValue::read,
        )?;
        let raw_aliases = read_records(
            &mut r,
            header.enum_alias_count,
            RawEnumAlias::SIZE,
            "enum alias records",
            RawEnumAlias::read,
        )?;
        let default_pool = r.read_bytes(header.default_pool_size as usize, "default value pool")?;
        let string_pool = r.read_bytes(header.string_pool_size as usize, "string pool")?;

        let names = NameResolver {
            names: self.names,
            pool: string_pool,
        };

        let mut types = HashMap::with_capacity(raw_types.len());
        for (&hash, raw) in type_hashes.iter().zip(&raw_types) {
            let hash = NameHash(hash);
            let range = clamp_range(raw.member_start, raw.member_count, raw_members.len());
            if range.len() != raw.member_count as usize {
                tracing::warn!(
                    %hash,
                    declared = raw.member_count,
                    available = range.len(),
                    "member range exceeds member pool, clamping"
                );
            }
            let members = raw_members[range]
                .iter()
                .map(|m| self.member(m, &names, default_pool))
                .collect::<Result<Vec<_>, _>>()?;

            let descriptor = TypeDescriptor {
                hash,
                name: names.resolve(hash.get(), raw.name_offset),
                flags: TypeFlags(raw.flags),
                size: raw.size.select(self.width),
                alignment: raw.alignment.select(self.width),
                members,
                comment: names.resolve(raw.comment_offset, raw.comment_offset),
            };
            if types.contains_key(&hash) {
                tracing::warn!(%hash, "duplicate type hash, keeping first");
                continue;
            }
            types.insert(hash, descriptor);
        }

        let mut enums = HashMap::with_capacity(raw_enums.len());
        for (&hash, raw) in enum_hashes.iter().zip(&raw_enums) {
            let hash = NameHash(hash);
            let code = (raw.storage & 0xFF) as u8;
            let storage = Storage::from_u8(code).ok_or(DecodeError::InvalidStorage(code))?;
            let range = clamp_range(raw.value_start, raw.value_count, raw_values.len());
            if range.len() != raw.value_count as usize {
                tracing::warn!(
                    %hash,
                    declared = raw.value_count,
                    available = range.len(),
                    "value range exceeds enum value pool, clamping"
                );
            }
            let values = raw_values[range]
                .iter()
                .map(|v| enum_value(hash, v, &raw_aliases, &names))
                .collect();

            let descriptor = EnumDescriptor {
                hash,
                name: names.resolve(hash.get(), raw.name_offset),
                comment: names.resolve(raw.comment_offset, raw.comment_offset),
                flags: raw.flags,
                storage,
                values,
            };
            if enums.contains_key(&hash) {
                tracing::warn!(%hash, "duplicate enum hash, keeping first");
                continue;
            }
            enums.insert(hash, descriptor);
        }

        tracing::debug!(
            types = types.len(),
            enums = enums.len(),
            members = raw_members.len(),
            enum_values = raw_values.len(),
            width = %self.width,
            "parsed type library"
        );

        Ok(Catalog {
            version: header.version,
            pointer_width: self.width,
            types,
            enums,
        })
    }

    fn member(
        &self,
        raw: &RawMember,
        names: &NameResolver<'_>,
        default_pool: &[u8],
    ) -> Result<MemberDescriptor, DecodeError> {
        let default = if raw.default_offset == NO_DEFAULT {
            None
        } else {
            let start = raw.default_offset as usize;
            let slice = start
                .checked_add(raw.default_size as usize)
                .and_then(|end| default_pool.get(start..end))
                .ok_or(DecodeError::DefaultOutOfRange {
                    offset: raw.default_offset,
                    size: raw.default_size,
                    pool: default_pool.len(),
                })?;
            Some(slice.to_vec())
        };

        Ok(MemberDescriptor {
            name: names.resolve(raw.name_offset, raw.name_offset),
            comment: names.resolve(raw.comment_offset, raw.comment_offset),
            type_ref: TypeRef::from_raw(raw.atom, raw.storage, raw.extent)?,
            ref_type: NameHash(raw.ref_type_hash),
            size: raw.size.select(self.width),
            alignment: raw.alignment.select(self.width),
            offset: raw.offset.select(self.width),
            default,
            flags: raw.flags,
        })
    }
}

fn enum_value(
    owner: NameHash,
    raw: &RawEnumValue,
    aliases: &[RawEnumAlias],
    names: &NameResolver<'_>,
) -> EnumValueDescriptor {
    let alias_name = |a: &RawEnumAlias| names.resolve(a.name_offset, a.name_offset);

    let name = match aliases.get(raw.main_alias as usize) {
        Some(alias) => alias_name(alias),
        None => {
            tracing::warn!(
                enum_hash = %owner,
                main_alias = raw.main_alias,
                aliases = aliases.len(),
                "main alias out of range, naming value by index"
            );
            format!("0x{:X}", raw.main_alias)
        }
    };

    let range = clamp_range(raw.alias_start, raw.alias_count, aliases.len());
    if range.len() != raw.alias_count as usize {
        tracing::warn!(
            enum_hash = %owner,
            value = raw.value,
            declared = raw.alias_count,
            available = range.len(),
            "alias range exceeds alias pool, clamping"
        );
    }
    EnumValueDescriptor {
        name,
        comment: names.resolve(raw.comment_offset, raw.comment_offset),
        value: raw.value as i64,
        aliases: aliases[range].iter().map(alias_name).collect(),
    }
}

/// `[start, start + count)` clamped to `len`.
///
/// Schemas compiled with fewer records than declared are tolerated.
fn clamp_range(start: u32, count: u32, len: usize) -> Range<usize> {
    let start = (start as usize).min(len);
    let end = start.saturating_add(count as usize).min(len);
    start..end
}

/// Resolves names and comments: dictionary, then string pool, then hex.
struct NameResolver<'a> {
    names: Option<&'a KnownNames>,
    pool: &'a [u8],
}

impl NameResolver<'_> {
    fn resolve(&self, key: u32, offset: u32) -> String {
        if let Some(name) = self.names.and_then(|n| n.get(NameHash(key))) {
            return name.to_owned();
        }
        if let Some(s) = self.pool_string(offset) {
            return s;
        }
        format!("0x{offset:X}")
    }

    /// NUL-terminated string at `offset`; `None` if out of range or unterminated.
    fn pool_string(&self, offset: u32) -> Option<String> {
        let tail = self.pool.get(offset as usize..)?;
        let len = tail.iter().position(|&b| b == 0)?;
        Some(String::from_utf8_lossy(&tail[..len]).into_owned())
    }
}
