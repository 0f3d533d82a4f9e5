#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Shared primitives for the typelib workspace.
//!
//! - [`NameHash`]: the 32-bit symbol hash every lookup in the format keys on
//! - [`KnownNames`]: recovery dictionary for schemas shipped with a stripped string pool
//! - [`PointerWidth`] / [`WidthValue`]: selection of width-dependent layout fields
//! - [`Colors`]: ANSI palette for human-readable dumps

mod colors;
mod hash;
mod names;
mod width;

#[cfg(test)]
mod names_tests;

pub use colors::Colors;
pub use hash::{HASH_SEED, NameHash, hash};
pub use names::KnownNames;
pub use width::{PointerWidth, WidthValue};
