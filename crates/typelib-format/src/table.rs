//! Generic component table reader.
//!
//! A component table is a wrapper struct with exactly two inline arrays: a
//! sparse index of `(resource_hash, slot)` entries and a payload array. The
//! shape is validated against the catalog once; reads then work on raw
//! wrapper bytes without touching the catalog again.

use std::collections::HashMap;

use typelib_core::NameHash;

use crate::catalog::{Catalog, MemberDescriptor};
use crate::constants::INDEX_ENTRY_MIN_SIZE;
use crate::error::{DecodeError, SchemaMismatch, TableError};
use crate::reader::ByteReader;

/// One sparse index entry. A zero resource hash marks an unused slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub resource: NameHash,
    pub slot: u32,
}

/// Location of one inline array inside the wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArraySection {
    pub offset: usize,
    pub capacity: u32,
    /// Element size in bytes.
    pub stride: usize,
}

impl ArraySection {
    fn from_member(m: &MemberDescriptor) -> Self {
        let capacity = m.type_ref.array_len().map_or(0, u32::from);
        let stride = if capacity == 0 {
            0
        } else {
            m.size as usize / capacity as usize
        };
        Self {
            offset: m.offset as usize,
            capacity,
            stride,
        }
    }

    fn byte_len(&self) -> usize {
        self.capacity as usize * self.stride
    }

    fn element_offset(&self, i: u32) -> usize {
        self.offset + i as usize * self.stride
    }
}

/// A validated index + payload wrapper shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableShape {
    pub wrapper: NameHash,
    pub index_type: NameHash,
    pub payload_type: NameHash,
    pub index: ArraySection,
    pub payload: ArraySection,
}

impl TableShape {
    /// Check that `wrapper` is a two-member table of `index_type` entries and
    /// `payload_type` records.
    pub fn validate(
        catalog: &Catalog,
        wrapper: NameHash,
        index_type: NameHash,
        payload_type: NameHash,
    ) -> Result<Self, SchemaMismatch> {
        let ty = catalog
            .get_type(wrapper)
            .ok_or(SchemaMismatch::UnknownWrapper(wrapper))?;
        if ty.members.len() != 2 {
            return Err(SchemaMismatch::MemberCount {
                wrapper,
                found: ty.members.len(),
            });
        }

        check_member(wrapper, 0, &ty.members[0], index_type)?;
        check_member(wrapper, 1, &ty.members[1], payload_type)?;

        let index = ArraySection::from_member(&ty.members[0]);
        let payload = ArraySection::from_member(&ty.members[1]);
        if index.capacity > 0 && index.stride < INDEX_ENTRY_MIN_SIZE {
            return Err(SchemaMismatch::IndexStride {
                wrapper,
                stride: index.stride,
                min: INDEX_ENTRY_MIN_SIZE,
            });
        }

        Ok(Self {
            wrapper,
            index_type,
            payload_type,
            index,
            payload,
        })
    }

    /// Size of one payload record in bytes.
    pub fn record_size(&self) -> usize {
        self.payload.stride
    }

    /// Decode the whole sparse index, unused entries included.
    pub fn read_index(&self, blob: &[u8]) -> Result<Vec<IndexEntry>, DecodeError> {
        let mut r = ByteReader::at(blob, self.index.offset);
        r.ensure(self.index.capacity as usize, self.index.stride, "sparse index")?;
        (0..self.index.capacity)
            .map(|i| read_entry(blob, self.index.element_offset(i)))
            .collect()
    }

    /// Every record keyed by resource hash, skipping unused entries.
    ///
    /// A hash listed twice maps to its first entry, like [`read_one`](Self::read_one).
    pub fn read_all(&self, blob: &[u8]) -> Result<HashMap<NameHash, Vec<u8>>, DecodeError> {
        let index = self.read_index(blob)?;
        let payload = ByteReader::at(blob, self.payload.offset)
            .read_bytes(self.payload.byte_len(), "payload array")?;

        let mut records = HashMap::new();
        for entry in index {
            if entry.resource.is_unset() {
                continue;
            }
            let start = self.checked_slot(entry.slot)? as usize * self.payload.stride;
            records
                .entry(entry.resource)
                .or_insert_with(|| payload[start..start + self.payload.stride].to_vec());
        }
        Ok(records)
    }

    /// The record for one resource, decoding only its index entry and payload.
    pub fn read_one(&self, blob: &[u8], resource: NameHash) -> Result<Vec<u8>, TableError> {
        let entry = self
            .find(blob, resource)?
            .ok_or(TableError::NotFound(resource))?;
        let slot = self.checked_slot(entry.slot)?;

        let mut r = ByteReader::at(blob, self.payload.element_offset(slot));
        Ok(r.read_bytes(self.payload.stride, "payload record")?.to_vec())
    }

    /// First index entry for `resource`. Unset hashes never match.
    pub fn find(&self, blob: &[u8], resource: NameHash) -> Result<Option<IndexEntry>, DecodeError> {
        if resource.is_unset() {
            return Ok(None);
        }
        for i in 0..self.index.capacity {
            let entry = read_entry(blob, self.index.element_offset(i))?;
            if entry.resource == resource {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }

    fn checked_slot(&self, slot: u32) -> Result<u32, DecodeError> {
        if slot >= self.payload.capacity {
            return Err(DecodeError::SlotOutOfRange {
                slot,
                capacity: self.payload.capacity,
            });
        }
        Ok(slot)
    }
}

fn check_member(
    wrapper: NameHash,
    member: usize,
    m: &MemberDescriptor,
    expected: NameHash,
) -> Result<(), SchemaMismatch> {
    if !m.type_ref.is_inline_struct_array() {
        return Err(SchemaMismatch::NotInlineStructArray {
            wrapper,
            member,
            atom: m.type_ref.atom,
            storage: m.type_ref.storage,
        });
    }
    if m.ref_type != expected {
        return Err(SchemaMismatch::ReferencedType {
            wrapper,
            member,
            expected,
            found: m.ref_type,
        });
    }
    Ok(())
}

fn read_entry(blob: &[u8], offset: usize) -> Result<IndexEntry, DecodeError> {
    let mut r = ByteReader::at(blob, offset);
    Ok(IndexEntry {
        resource: NameHash(r.read_u32("index resource hash")?),
        slot: r.read_u32("index slot")?,
    })
}
