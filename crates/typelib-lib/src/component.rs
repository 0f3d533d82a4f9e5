//! Component tables and their display projection.
//!
//! A component table is described by a [`ComponentSpec`]: the wrapper type
//! whose instance section holds the table, plus the index entry and payload
//! types. [`ComponentTable`] validates the shape once and hands out
//! [`Component`] records, each rendering itself through [`Component::to_display`].

use serde::Serialize;
use typelib_core::NameHash;
use typelib_format::{
    DecodeError, RecordDecoder, SchemaMismatch, TableError, TableShape, TypeDescriptor,
};

use crate::assets::{AssetSet, Lookup};

#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    #[error(transparent)]
    Schema(#[from] SchemaMismatch),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error("component table {name}: {source}")]
    Instance {
        name: String,
        #[source]
        source: DecodeError,
    },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Names a component table by its three type hashes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentSpec {
    pub name: String,
    pub wrapper: NameHash,
    pub index: NameHash,
    pub payload: NameHash,
}

impl ComponentSpec {
    pub fn new(
        name: impl Into<String>,
        wrapper: NameHash,
        index: NameHash,
        payload: NameHash,
    ) -> Self {
        Self {
            name: name.into(),
            wrapper,
            index,
            payload,
        }
    }

    /// Each type given as a symbol name or `0x` hex hash. The table is named
    /// after the wrapper.
    pub fn from_names(wrapper: &str, index: &str, payload: &str) -> Self {
        Self::new(
            wrapper,
            NameHash::parse_or_hash(wrapper),
            NameHash::parse_or_hash(index),
            NameHash::parse_or_hash(payload),
        )
    }
}

/// How a table's payload records are rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    /// Payload type is described by the catalog; records decode field by field.
    Structured,
    /// Payload type has no members in the catalog; records render as hex.
    Opaque,
}

impl ComponentKind {
    fn for_payload(ty: Option<&TypeDescriptor>) -> Self {
        match ty {
            Some(t) if !t.members.is_empty() => Self::Structured,
            _ => Self::Opaque,
        }
    }
}

/// One payload record of a component table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    pub kind: ComponentKind,
    pub resource: NameHash,
    pub payload_type: NameHash,
    pub bytes: Vec<u8>,
}

#[derive(Serialize)]
struct DisplayRecord {
    resource: String,
    hash: NameHash,
    value: serde_json::Value,
}

impl Component {
    /// JSON projection: resource label, hash and decoded value.
    pub fn to_display(&self, assets: &AssetSet) -> Result<serde_json::Value, ComponentError> {
        let value = match self.kind {
            ComponentKind::Structured => {
                let decoded = RecordDecoder::new(assets.catalog())
                    .with_names(assets.names())
                    .decode(self.payload_type, &self.bytes)?;
                serde_json::to_value(decoded)?
            }
            ComponentKind::Opaque => serde_json::Value::String(hex(&self.bytes)),
        };
        let display = DisplayRecord {
            resource: assets.label(self.resource),
            hash: self.resource,
            value,
        };
        Ok(serde_json::to_value(display)?)
    }
}

/// A validated component table over the entity blob.
#[derive(Debug)]
pub struct ComponentTable<'a> {
    assets: &'a AssetSet,
    spec: ComponentSpec,
    shape: TableShape,
    kind: ComponentKind,
    blob: &'a [u8],
}

impl<'a> ComponentTable<'a> {
    /// Validate the table shape and locate the wrapper's instance section.
    pub fn from_asset_set(
        assets: &'a AssetSet,
        spec: ComponentSpec,
        lookup: Lookup,
    ) -> Result<Self, ComponentError> {
        let catalog = assets.catalog();
        let shape = TableShape::validate(catalog, spec.wrapper, spec.index, spec.payload)?;
        let (_, blob) = assets
            .instance(spec.wrapper, lookup)
            .map_err(|source| ComponentError::Instance {
                name: spec.name.clone(),
                source,
            })?;
        let kind = ComponentKind::for_payload(catalog.get_type(spec.payload));

        tracing::debug!(
            table = %spec.name,
            index_capacity = shape.index.capacity,
            payload_capacity = shape.payload.capacity,
            record_size = shape.record_size(),
            ?kind,
            "validated component table"
        );

        Ok(Self {
            assets,
            spec,
            shape,
            kind,
            blob,
        })
    }

    pub fn spec(&self) -> &ComponentSpec {
        &self.spec
    }

    pub fn shape(&self) -> &TableShape {
        &self.shape
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// All records, ordered by resource hash.
    pub fn read_all(&self) -> Result<Vec<Component>, ComponentError> {
        let mut records: Vec<_> = self
            .shape
            .read_all(self.blob)?
            .into_iter()
            .map(|(resource, bytes)| self.component(resource, bytes))
            .collect();
        records.sort_by_key(|c| c.resource);
        Ok(records)
    }

    pub fn read_one(&self, resource: NameHash) -> Result<Component, ComponentError> {
        let bytes = self.shape.read_one(self.blob, resource)?;
        Ok(self.component(resource, bytes))
    }

    /// Every record projected for display.
    pub fn to_display(&self) -> Result<serde_json::Value, ComponentError> {
        let records = self
            .read_all()?
            .iter()
            .map(|c| c.to_display(self.assets))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(serde_json::Value::Array(records))
    }

    fn component(&self, resource: NameHash, bytes: Vec<u8>) -> Component {
        Component {
            kind: self.kind,
            resource,
            payload_type: self.spec.payload,
            bytes,
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
