#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Type library schema decoding and component record extraction.
//!
//! This crate contains:
//! - The schema blob decoder ([`CatalogParser`], [`Catalog`])
//! - The component table reader ([`TableShape`])
//! - Instance section lookup ([`find_instance`], [`InstanceIndex`])
//! - Record value decoding and catalog dumps ([`RecordDecoder`], [`dump`])
//!
//! All input is untrusted: every read is bounds-checked and failures are
//! reported as [`DecodeError`] rather than panics.

pub mod catalog;
pub mod constants;
pub mod dump;
pub mod error;
pub mod header;
pub mod instance;
pub mod reader;
pub mod records;
pub mod table;
pub mod type_ref;
pub mod value;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod value_tests;

pub use catalog::{
    Catalog, CatalogParser, EnumDescriptor, EnumValueDescriptor, MemberDescriptor,
    TypeDescriptor, TypeFlags,
};
pub use constants::{INSTANCE_MAGIC, NO_DEFAULT, SCHEMA_MAGIC, SCHEMA_VERSION};
pub use dump::{CatalogDump, dump};
pub use error::{DecodeError, SchemaMismatch, TableError};
pub use header::SchemaHeader;
pub use instance::{InstanceHeader, InstanceIndex, InstanceSection, find_instance};
pub use reader::ByteReader;
pub use table::{ArraySection, IndexEntry, TableShape};
pub use type_ref::{Atom, Storage, TypeRef};
pub use value::{RecordDecoder, Value};
