//! Synthetic schema and blob builders for tests.
//!
//! Library code never encodes; these exist so tests can describe inputs
//! structurally instead of as hand-counted byte arrays.

use typelib_core::{NameHash, WidthValue, hash};

use crate::constants::{INSTANCE_MAGIC, NO_DEFAULT, SCHEMA_MAGIC, SCHEMA_VERSION};
use crate::header::SchemaHeader;
use crate::type_ref::{Atom, Storage};

/// How names are written into records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NameEncoding {
    /// Offsets into a populated string pool.
    #[default]
    Pool,
    /// Stripped schema: name fields hold name hashes, string pool is empty.
    Stripped,
}

#[derive(Clone, Debug)]
pub struct MemberSpec {
    pub name: String,
    pub comment: String,
    pub atom: Atom,
    pub storage: Storage,
    pub extent: u16,
    pub ref_type: NameHash,
    pub size: WidthValue,
    pub alignment: WidthValue,
    pub offset: WidthValue,
    pub default: Option<Vec<u8>>,
    pub flags: u32,
}

impl MemberSpec {
    pub fn plain(name: &str, storage: Storage, size: u32, offset: u32) -> Self {
        Self {
            name: name.to_owned(),
            comment: String::new(),
            atom: Atom::Plain,
            storage,
            extent: 0,
            ref_type: NameHash::UNSET,
            size: WidthValue::uniform(size),
            alignment: WidthValue::uniform(size.clamp(1, 8)),
            offset: WidthValue::uniform(offset),
            default: None,
            flags: 0,
        }
    }

    /// Inline array of `capacity` structs of type `elem`.
    pub fn inline_structs(name: &str, elem: &str, capacity: u16, size: u32, offset: u32) -> Self {
        Self {
            atom: Atom::InlineArray,
            extent: capacity,
            ref_type: hash(elem),
            alignment: WidthValue::uniform(4),
            ..Self::plain(name, Storage::Struct, size, offset)
        }
    }

    pub fn with_ref(mut self, ty: &str) -> Self {
        self.ref_type = hash(ty);
        self
    }

    pub fn with_atom(mut self, atom: Atom, extent: u16) -> Self {
        self.atom = atom;
        self.extent = extent;
        self
    }

    pub fn with_offsets(mut self, offset32: u32, offset64: u32) -> Self {
        self.offset = WidthValue::new(offset32, offset64);
        self
    }

    pub fn with_sizes(mut self, size32: u32, size64: u32) -> Self {
        self.size = WidthValue::new(size32, size64);
        self
    }

    pub fn with_default(mut self, bytes: &[u8]) -> Self {
        self.default = Some(bytes.to_vec());
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_owned();
        self
    }
}

#[derive(Clone, Debug)]
pub struct TypeSpec {
    pub name: String,
    pub comment: String,
    pub flags: u32,
    pub size: WidthValue,
    pub alignment: WidthValue,
    pub members: Vec<MemberSpec>,
    /// Declared member count, if different from `members.len()`.
    pub declared_members: Option<u32>,
}

impl TypeSpec {
    pub fn new(name: &str, size: u32) -> Self {
        Self {
            name: name.to_owned(),
            comment: String::new(),
            flags: 0,
            size: WidthValue::uniform(size),
            alignment: WidthValue::uniform(4),
            members: Vec::new(),
            declared_members: None,
        }
    }

    pub fn member(mut self, m: MemberSpec) -> Self {
        self.members.push(m);
        self
    }

    pub fn with_sizes(mut self, size32: u32, size64: u32) -> Self {
        self.size = WidthValue::new(size32, size64);
        self
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_owned();
        self
    }

    pub fn declare_members(mut self, count: u32) -> Self {
        self.declared_members = Some(count);
        self
    }
}

#[derive(Clone, Debug)]
pub struct EnumValueSpec {
    pub name: String,
    pub value: i64,
    pub extra_aliases: Vec<String>,
    /// Absolute alias index written as the main alias, if not the value's own first alias.
    pub main_alias: Option<u32>,
    /// Declared alias count, if different from `1 + extra_aliases.len()`.
    pub declared_aliases: Option<u32>,
}

impl EnumValueSpec {
    pub fn new(name: &str, value: i64) -> Self {
        Self {
            name: name.to_owned(),
            value,
            extra_aliases: Vec::new(),
            main_alias: None,
            declared_aliases: None,
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.extra_aliases = aliases.iter().map(|a| (*a).to_owned()).collect();
        self
    }

    pub fn with_main_alias(mut self, index: u32) -> Self {
        self.main_alias = Some(index);
        self
    }

    pub fn declare_aliases(mut self, count: u32) -> Self {
        self.declared_aliases = Some(count);
        self
    }
}

#[derive(Clone, Debug)]
pub struct EnumSpec {
    pub name: String,
    pub storage: Storage,
    pub values: Vec<EnumValueSpec>,
    /// Raw storage code written instead of `storage`.
    pub storage_code: Option<u32>,
    /// Declared value count, if different from `values.len()`.
    pub declared_values: Option<u32>,
}

impl EnumSpec {
    pub fn new(name: &str, storage: Storage) -> Self {
        Self {
            name: name.to_owned(),
            storage,
            values: Vec::new(),
            storage_code: None,
            declared_values: None,
        }
    }

    pub fn value(self, name: &str, value: i64) -> Self {
        self.push(EnumValueSpec::new(name, value))
    }

    pub fn value_with_aliases(self, name: &str, value: i64, aliases: &[&str]) -> Self {
        self.push(EnumValueSpec::new(name, value).with_aliases(aliases))
    }

    pub fn push(mut self, v: EnumValueSpec) -> Self {
        self.values.push(v);
        self
    }

    pub fn with_storage_code(mut self, code: u32) -> Self {
        self.storage_code = Some(code);
        self
    }

    pub fn declare_values(mut self, count: u32) -> Self {
        self.declared_values = Some(count);
        self
    }
}

/// Builds a schema blob in the on-disk layout.
#[derive(Clone, Debug, Default)]
pub struct SchemaBuilder {
    pub encoding: NameEncoding,
    pub types: Vec<TypeSpec>,
    pub enums: Vec<EnumSpec>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stripped(mut self) -> Self {
        self.encoding = NameEncoding::Stripped;
        self
    }

    pub fn add_type(mut self, t: TypeSpec) -> Self {
        self.types.push(t);
        self
    }

    pub fn add_enum(mut self, e: EnumSpec) -> Self {
        self.enums.push(e);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut strings = StringPool::new(self.encoding);
        let mut defaults = Vec::<u8>::new();

        let mut type_records = Vec::new();
        let mut member_records = Vec::new();
        let mut member_total = 0u32;
        for t in &self.types {
            let start = member_total;
            for m in &t.members {
                let (def_off, def_size) = match &m.default {
                    Some(bytes) => {
                        let off = defaults.len() as u32;
                        defaults.extend_from_slice(bytes);
                        (off, bytes.len() as u32)
                    }
                    None => (NO_DEFAULT, 0),
                };
                put_u32(&mut member_records, strings.name(&m.name));
                put_u32(&mut member_records, strings.comment(&m.comment));
                member_records.push(m.atom as u8);
                member_records.push(m.storage as u8);
                member_records.extend_from_slice(&m.extent.to_le_bytes());
                put_u32(&mut member_records, m.ref_type.get());
                put_width(&mut member_records, m.size);
                put_width(&mut member_records, m.alignment);
                put_width(&mut member_records, m.offset);
                put_u32(&mut member_records, def_off);
                put_u32(&mut member_records, def_size);
                put_u32(&mut member_records, m.flags);
                member_total += 1;
            }

            put_u32(&mut type_records, strings.name(&t.name));
            put_u32(&mut type_records, t.flags);
            put_width(&mut type_records, t.size);
            put_width(&mut type_records, t.alignment);
            put_u32(&mut type_records, t.declared_members.unwrap_or(t.members.len() as u32));
            put_u32(&mut type_records, start);
            put_u32(&mut type_records, strings.comment(&t.comment));
        }

        let mut enum_records = Vec::new();
        let mut value_records = Vec::new();
        let mut alias_records = Vec::new();
        let mut value_total = 0u32;
        let mut alias_total = 0u32;
        for e in &self.enums {
            put_u32(&mut enum_records, strings.name(&e.name));
            put_u32(&mut enum_records, strings.comment(""));
            put_u32(&mut enum_records, 0);
            put_u32(&mut enum_records, e.storage_code.unwrap_or(e.storage as u32));
            put_u32(&mut enum_records, value_total);
            put_u32(&mut enum_records, e.declared_values.unwrap_or(e.values.len() as u32));

            for v in &e.values {
                let alias_start = alias_total;
                for alias in std::iter::once(&v.name).chain(&v.extra_aliases) {
                    put_u32(&mut alias_records, strings.name(alias));
                    alias_total += 1;
                }
                put_u32(&mut value_records, strings.comment(""));
                let alias_count = 1 + v.extra_aliases.len() as u32;
                put_u32(&mut value_records, v.main_alias.unwrap_or(alias_start));
                put_u32(&mut value_records, alias_start);
                put_u32(&mut value_records, v.declared_aliases.unwrap_or(alias_count));
                value_records.extend_from_slice(&(v.value as u64).to_le_bytes());
                value_total += 1;
            }
        }

        let pool = strings.into_bytes();
        let header = SchemaHeader {
            magic: SCHEMA_MAGIC,
            version: SCHEMA_VERSION,
            type_count: self.types.len() as u32,
            enum_count: self.enums.len() as u32,
            member_count: member_total,
            enum_value_count: value_total,
            enum_alias_count: alias_total,
            default_pool_size: defaults.len() as u32,
            string_pool_size: pool.len() as u32,
        };

        let mut out = header.to_bytes().to_vec();
        for t in &self.types {
            put_u32(&mut out, hash(&t.name).get());
        }
        for e in &self.enums {
            put_u32(&mut out, hash(&e.name).get());
        }
        out.extend_from_slice(&type_records);
        out.extend_from_slice(&enum_records);
        out.extend_from_slice(&member_records);
        out.extend_from_slice(&value_records);
        out.extend_from_slice(&alias_records);
        out.extend_from_slice(&defaults);
        out.extend_from_slice(&pool);
        out
    }
}

/// String pool that interns names and comments as NUL-terminated strings.
///
/// Offset 0 holds the empty string so unset comments resolve to "".
struct StringPool {
    encoding: NameEncoding,
    bytes: Vec<u8>,
}

impl StringPool {
    fn new(encoding: NameEncoding) -> Self {
        Self {
            encoding,
            bytes: vec![0],
        }
    }

    fn name(&mut self, s: &str) -> u32 {
        match self.encoding {
            NameEncoding::Pool => self.intern(s),
            NameEncoding::Stripped => hash(s).get(),
        }
    }

    fn comment(&mut self, s: &str) -> u32 {
        match self.encoding {
            NameEncoding::Pool => self.intern(s),
            NameEncoding::Stripped => 0,
        }
    }

    fn intern(&mut self, s: &str) -> u32 {
        if s.is_empty() {
            return 0;
        }
        let off = self.bytes.len() as u32;
        self.bytes.extend_from_slice(s.as_bytes());
        self.bytes.push(0);
        off
    }

    fn into_bytes(self) -> Vec<u8> {
        match self.encoding {
            NameEncoding::Pool => self.bytes,
            NameEncoding::Stripped => Vec::new(),
        }
    }
}

/// Component table blob: sparse index followed by the payload array.
#[derive(Clone, Debug)]
pub struct TableBlob {
    pub index_capacity: usize,
    pub index_stride: usize,
    pub payload_capacity: usize,
    pub payload_stride: usize,
    pub entries: Vec<(u32, u32)>,
    pub payloads: Vec<(usize, Vec<u8>)>,
}

impl TableBlob {
    pub fn new(index_capacity: usize, payload_capacity: usize, payload_stride: usize) -> Self {
        Self {
            index_capacity,
            index_stride: 12,
            payload_capacity,
            payload_stride,
            entries: Vec::new(),
            payloads: Vec::new(),
        }
    }

    /// Index entry at position `entries.len()`.
    pub fn entry(mut self, resource: u32, slot: u32) -> Self {
        self.entries.push((resource, slot));
        self
    }

    pub fn payload(mut self, slot: usize, bytes: &[u8]) -> Self {
        self.payloads.push((slot, bytes.to_vec()));
        self
    }

    /// Byte offset of the payload array (directly after the index).
    pub fn payload_offset(&self) -> usize {
        self.index_capacity * self.index_stride
    }

    pub fn total_size(&self) -> usize {
        self.payload_offset() + self.payload_capacity * self.payload_stride
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.total_size()];
        for (i, (resource, slot)) in self.entries.iter().enumerate() {
            let at = i * self.index_stride;
            out[at..at + 4].copy_from_slice(&resource.to_le_bytes());
            out[at + 4..at + 8].copy_from_slice(&slot.to_le_bytes());
        }
        let base = self.payload_offset();
        for (slot, bytes) in &self.payloads {
            let at = base + slot * self.payload_stride;
            out[at..at + bytes.len()].copy_from_slice(bytes);
        }
        out
    }

    /// Matching wrapper type: member 0 index, member 1 payload.
    pub fn wrapper_type(&self, wrapper: &str, index: &str, payload: &str) -> TypeSpec {
        let index_size = (self.index_capacity * self.index_stride) as u32;
        let payload_size = (self.payload_capacity * self.payload_stride) as u32;
        TypeSpec::new(wrapper, self.total_size() as u32)
            .member(MemberSpec::inline_structs(
                "index",
                index,
                self.index_capacity as u16,
                index_size,
                0,
            ))
            .member(MemberSpec::inline_structs(
                "payload",
                payload,
                self.payload_capacity as u16,
                payload_size,
                index_size,
            ))
    }
}

/// One instance section: 28-byte header followed by the payload.
pub fn instance_section(sentinel: u32, type_hash: NameHash, payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(28 + payload.len());
    put_u32(&mut out, sentinel);
    out.extend_from_slice(&INSTANCE_MAGIC);
    put_u32(&mut out, 1);
    put_u32(&mut out, type_hash.get());
    put_u32(&mut out, payload.len() as u32);
    out.push(1);
    out.extend_from_slice(&[0u8; 7]);
    out.extend_from_slice(payload);
    out
}

fn put_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn put_width(out: &mut Vec<u8>, v: WidthValue) {
    put_u32(out, v.value32);
    put_u32(out, v.value64);
}
