//! Tests for CLI dispatch logic.
//!
//! These tests verify:
//! 1. Unified flags: asset commands accept each other's flags without error
//! 2. Help visibility: hidden flags don't appear in --help
//! 3. Params extraction and conversion to command args

use std::path::PathBuf;

use typelib_core::{NameHash, PointerWidth, hash};
use typelib_lib::{ComponentSpec, Lookup};

use super::*;
use crate::cli::commands::{hash_command, instance_command, table_command, types_command};
use crate::commands::instance::InstanceArgs;
use crate::commands::table::TableArgs;
use crate::commands::types::TypesArgs;

const TABLE: [&str; 11] = [
    "table",
    "--schema",
    "schema.bin.gz",
    "--data",
    "entities.bin.gz",
    "--wrapper",
    "Wrap",
    "--index",
    "IndexEntry",
    "--payload",
    "Payload",
];

fn table_matches(extra: &[&str]) -> clap::error::Result<clap::ArgMatches> {
    table_command().try_get_matches_from(TABLE.iter().chain(extra))
}

#[test]
fn hash_collects_symbols() {
    let m = hash_command()
        .try_get_matches_from(["hash", "Foo", "Wrap"])
        .unwrap();
    let params = HashParams::from_matches(&m);
    assert_eq!(params.symbols, ["Foo", "Wrap"]);
}

#[test]
fn hash_requires_a_symbol() {
    let result = hash_command().try_get_matches_from(["hash"]);
    assert!(result.is_err());
}

#[test]
fn types_params() {
    let m = types_command()
        .try_get_matches_from([
            "types",
            "--schema",
            "schema.bin.gz",
            "--names",
            "names.txt",
            "--width",
            "32",
            "--filter",
            "Transform",
            "--color",
            "never",
        ])
        .unwrap();
    let params = TypesParams::from_matches(&m);

    assert_eq!(params.schema, PathBuf::from("schema.bin.gz"));
    assert_eq!(params.names, Some(PathBuf::from("names.txt")));
    assert_eq!(params.width, PointerWidth::Bits32);
    assert_eq!(params.filter.as_deref(), Some("Transform"));
    assert_eq!(params.color, ColorChoice::Never);

    let args: TypesArgs = params.into();
    assert!(!args.color);
}

#[test]
fn types_defaults() {
    let m = types_command()
        .try_get_matches_from(["types", "--schema", "schema.bin"])
        .unwrap();
    let params = TypesParams::from_matches(&m);

    assert_eq!(params.width, PointerWidth::Bits64);
    assert_eq!(params.names, None);
    assert_eq!(params.filter, None);
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn types_requires_schema() {
    let result = types_command().try_get_matches_from(["types", "--filter", "x"]);
    assert!(result.is_err());
}

#[test]
fn types_accepts_table_flags() {
    let result = types_command().try_get_matches_from([
        "types",
        "--schema",
        "schema.bin",
        "--data",
        "entities.bin",
        "--aux",
        "a.bin",
        "--indexed",
        "--compact",
    ]);
    assert!(
        result.is_ok(),
        "types should accept table flags: {:?}",
        result.err()
    );
}

#[test]
fn width_rejects_other_values() {
    let result =
        types_command().try_get_matches_from(["types", "--schema", "s.bin", "--width", "16"]);
    assert!(result.is_err());
}

#[test]
fn table_params_resolve_names() {
    let m = table_matches(&["--compact"]).unwrap();
    let args: TableArgs = TableParams::from_matches(&m).into();

    assert_eq!(
        args.spec,
        ComponentSpec::new("Wrap", hash("Wrap"), hash("IndexEntry"), hash("Payload"))
    );
    assert_eq!(args.sources.schema, PathBuf::from("schema.bin.gz"));
    assert_eq!(args.sources.entities, PathBuf::from("entities.bin.gz"));
    assert!(args.sources.aux.is_empty());
    assert_eq!(args.resource, None);
    assert_eq!(args.lookup, Lookup::Scan);
    assert!(args.compact);
}

#[test]
fn table_resource_by_hash_or_name() {
    let m = table_matches(&["--hash", "0x7C97BEAE"]).unwrap();
    let by_hash: TableArgs = TableParams::from_matches(&m).into();
    assert_eq!(by_hash.resource, Some(NameHash(0x7C97_BEAE)));

    let m = table_matches(&["--name", "hero"]).unwrap();
    let by_name: TableArgs = TableParams::from_matches(&m).into();
    assert_eq!(by_name.resource, by_hash.resource);
}

#[test]
fn table_hash_conflicts_with_name() {
    let result = table_matches(&["--hash", "0x1", "--name", "hero"]);
    assert!(result.is_err());
}

#[test]
fn table_requires_shape() {
    let result = table_command().try_get_matches_from([
        "table",
        "--schema",
        "s.bin",
        "--data",
        "e.bin",
        "--wrapper",
        "Wrap",
    ]);
    assert!(result.is_err());
}

#[test]
fn table_collects_aux_in_order() {
    let m = table_matches(&["--aux", "b.bin", "--aux", "a.bin", "--indexed", "--width", "32"])
        .unwrap();
    let args: TableArgs = TableParams::from_matches(&m).into();

    assert_eq!(
        args.sources.aux,
        [PathBuf::from("b.bin"), PathBuf::from("a.bin")]
    );
    assert_eq!(args.sources.width, PointerWidth::Bits32);
    assert_eq!(args.lookup, Lookup::Indexed);
}

#[test]
fn table_accepts_dump_flags() {
    let result = table_matches(&["--filter", "x", "--color", "always"]);
    assert!(
        result.is_ok(),
        "table should accept dump flags: {:?}",
        result.err()
    );
}

#[test]
fn instance_params() {
    let m = instance_command()
        .try_get_matches_from(["instance", "Foo", "--data", "entities.bin", "--indexed"])
        .unwrap();
    let args: InstanceArgs = InstanceParams::from_matches(&m).into();

    assert_eq!(args.type_hash, hash("Foo"));
    assert_eq!(args.data, PathBuf::from("entities.bin"));
    assert_eq!(args.lookup, Lookup::Indexed);

    let m = instance_command()
        .try_get_matches_from(["instance", "0x0B87D664", "--data", "entities.bin"])
        .unwrap();
    let args: InstanceArgs = InstanceParams::from_matches(&m).into();
    assert_eq!(args.type_hash, hash("Foo"));
    assert_eq!(args.lookup, Lookup::Scan);
}

#[test]
fn instance_accepts_schema_flags() {
    let result = instance_command().try_get_matches_from([
        "instance",
        "Foo",
        "--data",
        "entities.bin",
        "--schema",
        "schema.bin",
        "--width",
        "32",
        "--compact",
    ]);
    assert!(
        result.is_ok(),
        "instance should accept schema flags: {:?}",
        result.err()
    );
}

#[test]
fn types_help_hides_table_flags() {
    let mut cmd = types_command();
    let help = cmd.render_help().to_string();

    assert!(help.contains("--filter"));
    assert!(!help.contains("--data"), "types help should not show --data");
    assert!(!help.contains("--compact"), "types help should not show --compact");
    assert!(!help.contains("--indexed"), "types help should not show --indexed");
}

#[test]
fn table_help_hides_dump_flags() {
    let mut cmd = table_command();
    let help = cmd.render_help().to_string();

    assert!(help.contains("--wrapper"));
    assert!(!help.contains("--filter"), "table help should not show --filter");
    assert!(!help.contains("Colorize output"), "table help should not show --color");
}

#[test]
fn instance_help_hides_schema_flags() {
    let mut cmd = instance_command();
    let help = cmd.render_help().to_string();

    assert!(help.contains("--indexed"));
    assert!(!help.contains("Type library schema blob"));
    assert!(!help.contains("Pointer width"));
}

#[test]
fn verbose_is_global() {
    let matches = build_cli()
        .try_get_matches_from(["typelib", "-v", "hash", "Foo"])
        .unwrap();
    let (_, m) = matches.subcommand().unwrap();
    assert_eq!(m.get_count("verbose"), 1);

    let matches = build_cli()
        .try_get_matches_from(["typelib", "types", "--schema", "s.bin", "-vv"])
        .unwrap();
    let (name, m) = matches.subcommand().unwrap();
    assert_eq!(name, "types");
    assert_eq!(m.get_count("verbose"), 2);
}

#[test]
fn color_choice() {
    assert!(ColorChoice::Always.should_colorize());
    assert!(!ColorChoice::Never.should_colorize());
}
