//! Asset bundle loading.
//!
//! The schema blob, the entity blob and any auxiliary blobs ship gzip
//! compressed. [`AssetSet::load`] decompresses each one and builds the
//! well-known name dictionary in parallel, joins, then parses the catalog and
//! indexes the entity blob. The resulting [`AssetSet`] is immutable.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::string::FromUtf8Error;
use std::thread::ScopedJoinHandle;

use flate2::read::GzDecoder;
use typelib_core::{KnownNames, NameHash, PointerWidth};
use typelib_format::{Catalog, CatalogParser, DecodeError, InstanceHeader, InstanceIndex};

/// First two bytes of every gzip member.
const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decompress {}: {source}", path.display())]
    Decompress {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: DecodeError,
    },
    #[error("name list {} is not valid UTF-8", path.display())]
    Utf8 {
        path: PathBuf,
        #[source]
        source: FromUtf8Error,
    },
    #[error("asset loader thread panicked")]
    LoaderPanicked,
}

/// Where the asset blobs live.
#[derive(Clone, Debug, Default)]
pub struct AssetSources {
    pub schema: PathBuf,
    pub entities: PathBuf,
    pub aux: Vec<PathBuf>,
    /// Newline-delimited symbol list for name recovery.
    pub names: Option<PathBuf>,
    pub width: PointerWidth,
}

/// How to find an instance section in the entity blob.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lookup {
    /// Substring scan for the type hash ([`typelib_format::find_instance`]).
    Scan,
    /// Section index built at load time.
    #[default]
    Indexed,
}

/// Everything decoded at startup, shared read-only afterwards.
#[derive(Debug)]
pub struct AssetSet {
    catalog: Catalog,
    names: KnownNames,
    entities: Vec<u8>,
    instances: InstanceIndex,
    aux: Vec<Vec<u8>>,
}

impl AssetSet {
    pub fn load(sources: &AssetSources) -> Result<Self, AssetError> {
        let (schema, entities, aux, names) = std::thread::scope(|s| {
            let schema = s.spawn(|| read_blob(&sources.schema));
            let entities = s.spawn(|| read_blob(&sources.entities));
            let aux: Vec<_> = sources
                .aux
                .iter()
                .map(|path| s.spawn(move || read_blob(path)))
                .collect();
            let names = s.spawn(|| load_names(sources.names.as_deref()));

            (
                join(schema),
                join(entities),
                aux.into_iter().map(join).collect::<Vec<_>>(),
                join(names),
            )
        });

        let aux = aux.into_iter().collect::<Result<Vec<_>, _>>()?;
        Self::from_parts(&schema?, entities?, aux, names?, sources.width)
    }

    /// Build from already decompressed blobs.
    pub fn from_parts(
        schema: &[u8],
        entities: Vec<u8>,
        aux: Vec<Vec<u8>>,
        names: KnownNames,
        width: PointerWidth,
    ) -> Result<Self, AssetError> {
        let catalog = CatalogParser::new(width)
            .with_names(&names)
            .parse(schema)
            .map_err(|source| AssetError::Decode {
                what: "schema",
                source,
            })?;
        let instances = InstanceIndex::build(&entities);

        tracing::info!(
            types = catalog.type_count(),
            enums = catalog.enum_count(),
            sections = instances.len(),
            aux = aux.len(),
            names = names.len(),
            "loaded asset set"
        );

        Ok(Self {
            catalog,
            names,
            entities,
            instances,
            aux,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn names(&self) -> &KnownNames {
        &self.names
    }

    pub fn entities(&self) -> &[u8] {
        &self.entities
    }

    pub fn instances(&self) -> &InstanceIndex {
        &self.instances
    }

    pub fn aux(&self, i: usize) -> Option<&[u8]> {
        self.aux.get(i).map(Vec::as_slice)
    }

    pub fn aux_count(&self) -> usize {
        self.aux.len()
    }

    /// Locate the instance section of `type_hash` in the entity blob.
    pub fn instance(
        &self,
        type_hash: NameHash,
        lookup: Lookup,
    ) -> Result<(InstanceHeader, &[u8]), DecodeError> {
        match lookup {
            Lookup::Scan => typelib_format::find_instance(&self.entities, type_hash),
            Lookup::Indexed => self
                .instances
                .get(&self.entities, type_hash)
                .ok_or(DecodeError::PatternNotFound { hash: type_hash }),
        }
    }

    /// Known name for `hash`, or its hex form.
    pub fn label(&self, hash: NameHash) -> String {
        match self.names.get(hash) {
            Some(name) => name.to_owned(),
            None => hash.to_string(),
        }
    }
}

/// Inflate gzip data. Input without the gzip magic is returned as is.
pub fn decompress(raw: &[u8]) -> io::Result<Vec<u8>> {
    if !raw.starts_with(&GZIP_MAGIC) {
        return Ok(raw.to_vec());
    }
    let mut out = Vec::new();
    GzDecoder::new(raw).read_to_end(&mut out)?;
    Ok(out)
}

/// Read one blob from disk, inflating it when gzip compressed.
pub fn read_blob(path: &Path) -> Result<Vec<u8>, AssetError> {
    let raw = fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_owned(),
        source,
    })?;
    let bytes = decompress(&raw).map_err(|source| AssetError::Decompress {
        path: path.to_owned(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        compressed = raw.len(),
        bytes = bytes.len(),
        "read blob"
    );
    Ok(bytes)
}

/// Load the name list at `path`, or an empty dictionary without one.
pub fn load_names(path: Option<&Path>) -> Result<KnownNames, AssetError> {
    let Some(path) = path else {
        return Ok(KnownNames::new());
    };
    let bytes = read_blob(path)?;
    let text = String::from_utf8(bytes).map_err(|source| AssetError::Utf8 {
        path: path.to_owned(),
        source,
    })?;
    Ok(KnownNames::from_lines(&text))
}

fn join<T>(handle: ScopedJoinHandle<'_, Result<T, AssetError>>) -> Result<T, AssetError> {
    handle.join().unwrap_or(Err(AssetError::LoaderPanicked))
}
