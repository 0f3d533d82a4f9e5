//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs hold the raw flag values a command uses
//! - `from_matches()` pulls those fields, ignoring hidden unified flags
//! - `From<*Params>` impls resolve names to hashes and build command args

use std::path::PathBuf;

use clap::ArgMatches;
use typelib_core::{NameHash, PointerWidth, hash};
use typelib_lib::{AssetSources, ComponentSpec, Lookup};

use super::ColorChoice;
use crate::commands::hash::HashArgs;
use crate::commands::instance::InstanceArgs;
use crate::commands::table::TableArgs;
use crate::commands::types::TypesArgs;

pub struct HashParams {
    pub symbols: Vec<String>,
}

impl HashParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            symbols: m
                .get_many::<String>("symbols")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
        }
    }
}

impl From<HashParams> for HashArgs {
    fn from(p: HashParams) -> Self {
        Self { symbols: p.symbols }
    }
}

pub struct TypesParams {
    pub schema: PathBuf,
    pub names: Option<PathBuf>,
    pub width: PointerWidth,
    pub filter: Option<String>,
    pub color: ColorChoice,
    // Note: data, aux, indexed, compact are parsed but not extracted (unified flags)
}

impl TypesParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            schema: required_path(m, "schema"),
            names: m.get_one::<PathBuf>("names").cloned(),
            width: parse_width(m),
            filter: m.get_one::<String>("filter").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<TypesParams> for TypesArgs {
    fn from(p: TypesParams) -> Self {
        Self {
            schema: p.schema,
            names: p.names,
            width: p.width,
            filter: p.filter,
            color: p.color.should_colorize(),
        }
    }
}

pub struct TableParams {
    pub schema: PathBuf,
    pub data: PathBuf,
    pub aux: Vec<PathBuf>,
    pub names: Option<PathBuf>,
    pub width: PointerWidth,
    pub wrapper: String,
    pub index: String,
    pub payload: String,
    pub hash: Option<String>,
    pub name: Option<String>,
    pub indexed: bool,
    pub compact: bool,
}

impl TableParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            // Assets
            schema: required_path(m, "schema"),
            data: required_path(m, "data"),
            aux: m
                .get_many::<PathBuf>("aux")
                .map(|values| values.cloned().collect())
                .unwrap_or_default(),
            names: m.get_one::<PathBuf>("names").cloned(),
            width: parse_width(m),

            // Table shape
            wrapper: required_text(m, "wrapper"),
            index: required_text(m, "index"),
            payload: required_text(m, "payload"),

            // Selection and output
            hash: m.get_one::<String>("hash").cloned(),
            name: m.get_one::<String>("name").cloned(),
            indexed: m.get_flag("indexed"),
            compact: m.get_flag("compact"),
        }
    }
}

impl From<TableParams> for TableArgs {
    fn from(p: TableParams) -> Self {
        let resource = match (p.hash, p.name) {
            (Some(text), _) => Some(NameHash::parse_or_hash(&text)),
            (None, Some(name)) => Some(hash(&name)),
            (None, None) => None,
        };
        Self {
            sources: AssetSources {
                schema: p.schema,
                entities: p.data,
                aux: p.aux,
                names: p.names,
                width: p.width,
            },
            spec: ComponentSpec::from_names(&p.wrapper, &p.index, &p.payload),
            resource,
            lookup: parse_lookup(p.indexed),
            compact: p.compact,
        }
    }
}

pub struct InstanceParams {
    pub type_name: String,
    pub data: PathBuf,
    pub names: Option<PathBuf>,
    pub indexed: bool,
    pub color: ColorChoice,
}

impl InstanceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            type_name: required_text(m, "type"),
            data: required_path(m, "data"),
            names: m.get_one::<PathBuf>("names").cloned(),
            indexed: m.get_flag("indexed"),
            color: parse_color(m),
        }
    }
}

impl From<InstanceParams> for InstanceArgs {
    fn from(p: InstanceParams) -> Self {
        Self {
            type_hash: NameHash::parse_or_hash(&p.type_name),
            data: p.data,
            names: p.names,
            lookup: parse_lookup(p.indexed),
            color: p.color.should_colorize(),
        }
    }
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

fn parse_width(m: &ArgMatches) -> PointerWidth {
    m.get_one::<String>("width")
        .and_then(|s| s.parse().ok())
        .and_then(PointerWidth::from_bits)
        .unwrap_or(PointerWidth::Bits64)
}

fn parse_lookup(indexed: bool) -> Lookup {
    if indexed { Lookup::Indexed } else { Lookup::Scan }
}

// Presence is enforced by clap; the defaults are never observed.
fn required_path(m: &ArgMatches, id: &str) -> PathBuf {
    m.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

fn required_text(m: &ArgMatches, id: &str) -> String {
    m.get_one::<String>(id).cloned().unwrap_or_default()
}
