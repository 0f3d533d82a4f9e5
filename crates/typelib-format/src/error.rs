//! Error types for schema decoding and record extraction.

use typelib_core::NameHash;

use crate::type_ref::{Atom, Storage};

/// Truncated or malformed bytes.
///
/// Always fatal to the call that produced it; nothing is partially applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error(
        "unexpected end of data reading {what} at offset {offset}: need {needed} bytes, {available} available"
    )]
    UnexpectedEof {
        what: &'static str,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("invalid magic: expected {expected:?}, found {found:?}")]
    InvalidMagic { expected: [u8; 4], found: [u8; 4] },
    #[error("invalid type atom: {0}")]
    InvalidAtom(u8),
    #[error("invalid storage kind: {0}")]
    InvalidStorage(u8),
    #[error("default value at {offset} (+{size}) exceeds pool of {pool} bytes")]
    DefaultOutOfRange { offset: u32, size: u32, pool: usize },
    #[error("slot {slot} out of range for payload capacity {capacity}")]
    SlotOutOfRange { slot: u32, capacity: u32 },
    #[error("type hash {hash} not present in blob")]
    PatternNotFound { hash: NameHash },
    #[error(
        "type hash {hash} found at offset {offset}, too close to the start for an instance header"
    )]
    HeaderBeforeStart { hash: NameHash, offset: usize },
    #[error("record nesting exceeds {0} levels")]
    NestingTooDeep(usize),
}

/// The wrapper type no longer has the two-member index + payload shape.
///
/// Signals a compatibility break with the shipped schema, not a transient fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaMismatch {
    #[error("wrapper type {0} not found in catalog")]
    UnknownWrapper(NameHash),
    #[error("wrapper type {wrapper} has {found} members, expected 2")]
    MemberCount { wrapper: NameHash, found: usize },
    #[error(
        "member {member} of wrapper {wrapper} must be an inline array of structs, found {atom:?} of {storage:?}"
    )]
    NotInlineStructArray {
        wrapper: NameHash,
        member: usize,
        atom: Atom,
        storage: Storage,
    },
    #[error("member {member} of wrapper {wrapper} references {found}, expected {expected}")]
    ReferencedType {
        wrapper: NameHash,
        member: usize,
        expected: NameHash,
        found: NameHash,
    },
    #[error("index entries of wrapper {wrapper} are {stride} bytes, need at least {min}")]
    IndexStride {
        wrapper: NameHash,
        stride: usize,
        min: usize,
    },
}

/// Failure reading records out of a validated component table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("resource {0} not found in index")]
    NotFound(NameHash),
}
