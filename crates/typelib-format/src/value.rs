//! Decoding record bytes into structured values.
//!
//! [`RecordDecoder`] walks a record using its [`TypeDescriptor`] and produces
//! a [`Value`] tree. Pointers, strings and out-of-line arrays point outside
//! the record, so they surface as raw pointer-width integers.

use indexmap::IndexMap;
use serde::Serialize;
use typelib_core::{KnownNames, NameHash, PointerWidth};

use crate::catalog::{Catalog, MemberDescriptor, TypeDescriptor};
use crate::error::DecodeError;
use crate::reader::ByteReader;
use crate::type_ref::{Atom, Storage};

/// Default limit on nested struct members.
pub const MAX_DEPTH: usize = 32;

/// A decoded field value.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    UInt(u64),
    Float(f64),
    /// Enum value name, or a known symbol name for a hash-valued field.
    Symbol(String),
    Array(Vec<Value>),
    Struct(IndexMap<String, Value>),
    /// Bytes of a struct whose type is not in the catalog.
    Bytes(Vec<u8>),
}

impl Value {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(v) => Some(*v),
            Self::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Member of a struct value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Struct(fields) => fields.get(name),
            _ => None,
        }
    }
}

/// Decodes records of catalog types.
#[derive(Clone, Copy, Debug)]
pub struct RecordDecoder<'c> {
    catalog: &'c Catalog,
    names: Option<&'c KnownNames>,
    max_depth: usize,
}

impl<'c> RecordDecoder<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            names: None,
            max_depth: MAX_DEPTH,
        }
    }

    /// Render `u32` fields holding a known name hash as that name.
    pub fn with_names(mut self, names: &'c KnownNames) -> Self {
        self.names = Some(names);
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Decode one record of `type_hash`.
    ///
    /// An unknown type yields [`Value::Bytes`].
    pub fn decode(&self, type_hash: NameHash, bytes: &[u8]) -> Result<Value, DecodeError> {
        match self.catalog.get_type(type_hash) {
            Some(ty) => self.decode_struct(ty, bytes, 0),
            None => Ok(Value::Bytes(bytes.to_vec())),
        }
    }

    fn width(&self) -> PointerWidth {
        self.catalog.pointer_width()
    }

    fn decode_struct(
        &self,
        ty: &TypeDescriptor,
        bytes: &[u8],
        depth: usize,
    ) -> Result<Value, DecodeError> {
        if depth > self.max_depth {
            return Err(DecodeError::NestingTooDeep(self.max_depth));
        }

        let mut fields = IndexMap::with_capacity(ty.members.len());
        let mut bits = BitCursor::default();
        for m in &ty.members {
            let value = match m.type_ref.atom {
                Atom::Plain => {
                    let field = slice(bytes, m.offset as usize, m.size as usize)?;
                    self.scalar(m.type_ref.storage, m.ref_type, field, depth)?
                }
                Atom::Array => {
                    let field = slice(bytes, m.offset as usize, self.width().bytes())?;
                    Value::UInt(read_uint(field, self.width().bytes())?)
                }
                Atom::InlineArray => self.inline_array(m, bytes, depth)?,
                Atom::Bitfield => self.bitfield(m, bytes, &mut bits)?,
            };
            if m.type_ref.atom != Atom::Bitfield {
                bits = BitCursor::default();
            }
            fields.insert(m.name.clone(), value);
        }
        Ok(Value::Struct(fields))
    }

    fn inline_array(
        &self,
        m: &MemberDescriptor,
        bytes: &[u8],
        depth: usize,
    ) -> Result<Value, DecodeError> {
        let capacity = m.type_ref.array_len().map_or(0, usize::from);
        if capacity == 0 {
            return Ok(Value::Array(Vec::new()));
        }
        let stride = m.size as usize / capacity;
        let whole = slice(bytes, m.offset as usize, stride * capacity)?;
        whole
            .chunks_exact(stride.max(1))
            .take(capacity)
            .map(|elem| self.scalar(m.type_ref.storage, m.ref_type, elem, depth))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array)
    }

    fn bitfield(
        &self,
        m: &MemberDescriptor,
        bytes: &[u8],
        bits: &mut BitCursor,
    ) -> Result<Value, DecodeError> {
        let storage = m.type_ref.storage;
        let size = storage.scalar_size().unwrap_or(m.size as usize);
        let raw = read_uint(slice(bytes, m.offset as usize, size)?, size)?;

        let width = m.type_ref.bit_width().map_or(0, u32::from);
        let shift = bits.advance(m.offset, width);
        let mut value = raw.checked_shr(shift).unwrap_or(0) & mask(width);

        if storage.is_signed() && width > 0 && width < 64 {
            value = sign_extend(value, width) as u64;
        }
        Ok(self.integer(storage, m.ref_type, value))
    }

    fn scalar(
        &self,
        storage: Storage,
        ref_type: NameHash,
        bytes: &[u8],
        depth: usize,
    ) -> Result<Value, DecodeError> {
        match storage {
            Storage::F32 => {
                let v = ByteReader::new(bytes).read_u32("f32 value")?;
                Ok(Value::Float(f64::from(f32::from_bits(v))))
            }
            Storage::F64 => {
                let v = ByteReader::new(bytes).read_u64("f64 value")?;
                Ok(Value::Float(f64::from_bits(v)))
            }
            Storage::String | Storage::Pointer => {
                Ok(Value::UInt(read_uint(bytes, self.width().bytes())?))
            }
            Storage::Struct => match self.catalog.get_type(ref_type) {
                Some(ty) => self.decode_struct(ty, bytes, depth + 1),
                None => Ok(Value::Bytes(bytes.to_vec())),
            },
            _ => {
                let size = storage.scalar_size().unwrap_or(8);
                let raw = read_uint(bytes, size)?;
                let value = if storage.is_signed() {
                    sign_extend(raw, size as u32 * 8) as u64
                } else {
                    raw
                };
                Ok(self.integer(storage, ref_type, value))
            }
        }
    }

    /// Integer value, resolved to a symbol when possible.
    fn integer(&self, storage: Storage, ref_type: NameHash, value: u64) -> Value {
        if storage.is_enum() {
            let name = self
                .catalog
                .get_enum(ref_type)
                .and_then(|e| e.value_of(value as i64));
            if let Some(v) = name {
                return Value::Symbol(v.name.clone());
            }
        }
        if storage == Storage::U32 && value != 0 {
            let known = self.names.and_then(|n| n.get(NameHash(value as u32)));
            if let Some(name) = known {
                return Value::Symbol(name.to_owned());
            }
        }
        if storage.is_signed() {
            Value::Int(value as i64)
        } else {
            Value::UInt(value)
        }
    }
}

/// Bit position inside a run of bitfields sharing one storage unit.
#[derive(Default)]
struct BitCursor {
    offset: Option<u32>,
    used: u32,
}

impl BitCursor {
    /// Shift of the next field of `width` bits at byte `offset`.
    fn advance(&mut self, offset: u32, width: u32) -> u32 {
        if self.offset != Some(offset) {
            self.offset = Some(offset);
            self.used = 0;
        }
        let shift = self.used;
        self.used += width;
        shift
    }
}

fn slice(bytes: &[u8], offset: usize, len: usize) -> Result<&[u8], DecodeError> {
    ByteReader::at(bytes, offset).read_bytes(len, "member value")
}

fn read_uint(bytes: &[u8], size: usize) -> Result<u64, DecodeError> {
    let mut r = ByteReader::new(bytes);
    Ok(match size {
        1 => u64::from(r.read_u8("integer value")?),
        2 => u64::from(r.read_u16("integer value")?),
        4 => u64::from(r.read_u32("integer value")?),
        _ => r.read_u64("integer value")?,
    })
}

fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn sign_extend(value: u64, bits: u32) -> i64 {
    let shift = 64 - bits.clamp(1, 64);
    ((value << shift) as i64) >> shift
}
