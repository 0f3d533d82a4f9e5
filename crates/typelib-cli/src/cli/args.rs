//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` so commands can compose the same
//! definition, hiding the ones they ignore (via `.hide(true)`).

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Schema blob, gzip or raw (--schema).
pub fn schema_arg() -> Arg {
    Arg::new("schema")
        .long("schema")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Type library schema blob (gzip or raw)")
}

/// Entity blob holding instance sections (--data).
pub fn data_arg() -> Arg {
    Arg::new("data")
        .long("data")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Entity blob with instance sections (gzip or raw)")
}

/// Auxiliary blobs, repeatable (--aux).
pub fn aux_arg() -> Arg {
    Arg::new("aux")
        .long("aux")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .action(ArgAction::Append)
        .help("Auxiliary blob loaded alongside the schema (repeatable)")
}

/// Symbol list for name recovery (--names).
pub fn names_arg() -> Arg {
    Arg::new("names")
        .long("names")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Newline-delimited symbol list used to recover hashed names")
}

/// Pointer width of the target layout (--width).
pub fn width_arg() -> Arg {
    Arg::new("width")
        .long("width")
        .value_name("BITS")
        .default_value("64")
        .value_parser(["32", "64"])
        .help("Pointer width the blobs were built for")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .global(true)
        .help("Log verbosity (-v for debug, -vv for trace); RUST_LOG overrides")
}

/// Case-insensitive name filter (--filter).
pub fn filter_arg() -> Arg {
    Arg::new("filter")
        .long("filter")
        .value_name("TEXT")
        .help("Only show types and enums whose name contains TEXT")
}

/// Table wrapper type (--wrapper).
pub fn wrapper_arg() -> Arg {
    Arg::new("wrapper")
        .long("wrapper")
        .value_name("TYPE")
        .help("Wrapper type holding the index and payload arrays (name or 0x hash)")
}

/// Index entry type (--index).
pub fn index_arg() -> Arg {
    Arg::new("index")
        .long("index")
        .value_name("TYPE")
        .help("Index entry type (name or 0x hash)")
}

/// Payload record type (--payload).
pub fn payload_arg() -> Arg {
    Arg::new("payload")
        .long("payload")
        .value_name("TYPE")
        .help("Payload record type (name or 0x hash)")
}

/// Resource hash to read (--hash).
pub fn resource_hash_arg() -> Arg {
    Arg::new("hash")
        .long("hash")
        .value_name("HASH")
        .conflicts_with("name")
        .help("Read the record of one resource by 0x hash")
}

/// Resource name to read (--name).
pub fn resource_name_arg() -> Arg {
    Arg::new("name")
        .long("name")
        .value_name("NAME")
        .help("Read the record of one resource by symbol name")
}

/// Use the section index instead of the substring scan (--indexed).
pub fn indexed_arg() -> Arg {
    Arg::new("indexed")
        .long("indexed")
        .action(ArgAction::SetTrue)
        .help("Locate instance sections through the section index instead of a byte scan")
}

/// Output compact JSON (--compact).
pub fn compact_arg() -> Arg {
    Arg::new("compact")
        .long("compact")
        .action(ArgAction::SetTrue)
        .help("Output compact JSON")
}

/// Symbol names to hash (positional, one or more).
pub fn symbols_arg() -> Arg {
    Arg::new("symbols")
        .value_name("NAME")
        .num_args(1..)
        .required(true)
        .help("Symbol names to hash")
}

/// Instance type (positional).
pub fn type_arg() -> Arg {
    Arg::new("type")
        .value_name("TYPE")
        .required(true)
        .help("Type name or 0x hash of the instance section")
}
