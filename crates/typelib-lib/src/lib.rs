#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Asset loading and component access on top of `typelib-format`.
//!
//! [`AssetSet`] is the single immutable context: catalog, name dictionary,
//! entity blob and its section index. Component tables are read through
//! [`ComponentTable`], which validates the table shape once per table.

pub mod assets;
pub mod component;

#[cfg(test)]
mod assets_tests;

pub use assets::{
    AssetError, AssetSet, AssetSources, Lookup, decompress, load_names, read_blob,
};
pub use component::{Component, ComponentError, ComponentKind, ComponentSpec, ComponentTable};
