//! Component instance sections.
//!
//! An entity blob is a sequence of sections, each a 28-byte [`InstanceHeader`]
//! followed by `size` payload bytes. Two ways to find one:
//!
//! - [`find_instance`]: substring scan for the type hash. Matches the behavior
//!   existing tooling relies on, including its blind spot: a payload that
//!   happens to contain the hash bytes shadows the real header.
//! - [`InstanceIndex`]: walks the section chain once and keys sections by
//!   type hash. Immune to payload collisions.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::ops::Range;

use memchr::memmem;
use typelib_core::{NameHash, PointerWidth};

use crate::constants::{INSTANCE_HEADER_SIZE, INSTANCE_MAGIC, INSTANCE_TYPE_HASH_OFFSET};
use crate::error::DecodeError;
use crate::reader::ByteReader;

/// Header preceding each instance payload.
///
/// Layout:
/// - 0-3: sentinel
/// - 4-7: magic `b"INST"`
/// - 8-11: version
/// - 12-15: type hash
/// - 16-19: payload size
/// - 20: pointer width flag (0 = 32-bit)
/// - 21-27: padding
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstanceHeader {
    pub sentinel: u32,
    pub magic: [u8; 4],
    pub version: u32,
    pub type_hash: NameHash,
    pub size: u32,
    pub pointer_width: PointerWidth,
}

impl InstanceHeader {
    pub fn read(r: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        r.ensure(1, INSTANCE_HEADER_SIZE, "instance header")?;
        let header = Self {
            sentinel: r.read_u32("instance sentinel")?,
            magic: r.read_array("instance magic")?,
            version: r.read_u32("instance version")?,
            type_hash: NameHash(r.read_u32("instance type hash")?),
            size: r.read_u32("instance size")?,
            pointer_width: PointerWidth::from_flag(r.read_u8("instance pointer width")?),
        };
        r.skip(7, "instance header padding")?;
        Ok(header)
    }

    pub fn has_valid_magic(&self) -> bool {
        self.magic == INSTANCE_MAGIC
    }
}

/// Locate the instance section of `type_hash` by scanning for its bytes.
///
/// The header is assumed to start 12 bytes before the first match. Neither
/// the magic nor uniqueness of the match is checked.
pub fn find_instance(
    blob: &[u8],
    type_hash: NameHash,
) -> Result<(InstanceHeader, &[u8]), DecodeError> {
    let pattern = type_hash.to_le_bytes();
    let found = memmem::find(blob, &pattern)
        .ok_or(DecodeError::PatternNotFound { hash: type_hash })?;
    let start = found
        .checked_sub(INSTANCE_TYPE_HASH_OFFSET)
        .ok_or(DecodeError::HeaderBeforeStart {
            hash: type_hash,
            offset: found,
        })?;

    let mut r = ByteReader::at(blob, start);
    let header = InstanceHeader::read(&mut r)?;
    let payload = r.read_bytes(header.size as usize, "instance payload")?;
    Ok((header, payload))
}

/// One indexed section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceSection {
    pub header: InstanceHeader,
    /// Header start inside the blob.
    pub offset: usize,
    /// Payload byte range inside the blob.
    pub payload: Range<usize>,
}

/// Sections of an entity blob keyed by type hash.
#[derive(Clone, Debug, Default)]
pub struct InstanceIndex {
    sections: HashMap<NameHash, InstanceSection>,
}

impl InstanceIndex {
    /// Walk the section chain from the start of `blob`.
    ///
    /// Stops with a warning at the first header without the `INST` magic, at
    /// trailing bytes too short for a header, and at a payload running past
    /// the end. Sections indexed before the stop stay reachable.
    pub fn build(blob: &[u8]) -> Self {
        let mut index = Self::default();
        let mut r = ByteReader::new(blob);

        while !r.is_empty() {
            let offset = r.position();
            let header = match InstanceHeader::read(&mut r) {
                Ok(header) => header,
                Err(_) => {
                    tracing::warn!(
                        offset,
                        trailing = blob.len() - offset,
                        "trailing bytes after last instance section"
                    );
                    break;
                }
            };
            if !header.has_valid_magic() {
                tracing::warn!(
                    offset,
                    magic = ?header.magic,
                    "bad instance magic, stopping section walk"
                );
                break;
            }
            let start = r.position();
            if let Err(err) = r.skip(header.size as usize, "instance payload") {
                tracing::warn!(
                    offset,
                    hash = %header.type_hash,
                    %err,
                    "truncated instance section, stopping section walk"
                );
                break;
            }

            let section = InstanceSection {
                header,
                offset,
                payload: start..r.position(),
            };
            match index.sections.entry(header.type_hash) {
                Entry::Occupied(first) => {
                    tracing::warn!(
                        hash = %header.type_hash,
                        first = first.get().offset,
                        duplicate = offset,
                        "duplicate instance section, keeping first"
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(section);
                }
            }
        }

        tracing::debug!(
            sections = index.len(),
            bytes = blob.len(),
            "indexed instance sections"
        );
        index
    }

    pub fn locate(&self, type_hash: NameHash) -> Option<&InstanceSection> {
        self.sections.get(&type_hash)
    }

    /// Header and payload of `type_hash` within the blob the index was built from.
    pub fn get<'a>(
        &self,
        blob: &'a [u8],
        type_hash: NameHash,
    ) -> Option<(InstanceHeader, &'a [u8])> {
        let section = self.locate(type_hash)?;
        let payload = blob.get(section.payload.clone())?;
        Some((section.header, payload))
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}
