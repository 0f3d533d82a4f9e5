//! Command builders for the CLI.
//!
//! Every command that touches blobs accepts the whole set of asset flags, so
//! one invocation line can be retargeted at another command. Flags a command
//! ignores are hidden from its `--help`.

use clap::Command;

use super::args::*;

/// Add hidden asset inputs (for commands that load only some blobs).
fn with_hidden_aux_args(cmd: Command) -> Command {
    cmd.arg(aux_arg().hide(true))
}

/// Add hidden output args (for commands that don't print JSON).
fn with_hidden_json_args(cmd: Command) -> Command {
    cmd.arg(compact_arg().hide(true))
}

/// Add hidden dump args (for commands that don't dump the catalog).
fn with_hidden_dump_args(cmd: Command) -> Command {
    cmd.arg(filter_arg().hide(true))
}

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("typelib")
        .about("Inspect type library schemas and the component records they describe")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(verbose_arg())
        .subcommand(hash_command())
        .subcommand(types_command())
        .subcommand(table_command())
        .subcommand(instance_command())
}

/// Print the name hash of each symbol.
pub fn hash_command() -> Command {
    Command::new("hash")
        .about("Print the 32-bit name hash of symbols")
        .after_help(
            r#"EXAMPLES:
  typelib hash Foo                    # 0x0B87D664  Foo
  typelib hash Wrap IndexEntry        # one line per name"#,
        )
        .arg(symbols_arg())
}

/// Dump the type catalog.
///
/// Only the schema and the name list are read; entity flags are accepted and
/// ignored.
pub fn types_command() -> Command {
    let cmd = Command::new("types")
        .about("Dump the types and enums of a schema")
        .override_usage(
            "\
  typelib types --schema <FILE> [--names <FILE>]
  typelib types --schema <FILE> --filter <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  typelib types --schema schema.bin.gz                    # whole catalog
  typelib types --schema schema.bin.gz --names names.txt  # stripped schema
  typelib types --schema schema.bin.gz --filter transform --width 32"#,
        )
        .arg(schema_arg().required(true))
        .arg(names_arg())
        .arg(width_arg())
        .arg(filter_arg())
        .arg(color_arg());

    // Hidden unified flags
    with_hidden_json_args(with_hidden_aux_args(
        cmd.arg(data_arg().hide(true)).arg(indexed_arg().hide(true)),
    ))
}

/// Read a component table and print it as JSON.
pub fn table_command() -> Command {
    let cmd = Command::new("table")
        .about("Read a component table and print its records as JSON")
        .override_usage(
            "\
  typelib table --schema <FILE> --data <FILE> --wrapper <TYPE> --index <TYPE> --payload <TYPE>
  typelib table ... --name <NAME>
  typelib table ... --hash <HASH>",
        )
        .after_help(
            r#"EXAMPLES:
  typelib table --schema s.gz --data e.gz --wrapper Wrap --index IndexEntry --payload Payload
  typelib table ... --name hero           # one record
  typelib table ... --hash 0x7C97BEAE     # one record by hash
  typelib table ... --indexed --compact   # section index, single-line JSON"#,
        )
        .arg(schema_arg().required(true))
        .arg(data_arg().required(true))
        .arg(aux_arg())
        .arg(names_arg())
        .arg(width_arg())
        .arg(wrapper_arg().required(true))
        .arg(index_arg().required(true))
        .arg(payload_arg().required(true))
        .arg(resource_hash_arg())
        .arg(resource_name_arg())
        .arg(indexed_arg())
        .arg(compact_arg());

    // Hidden unified flags
    with_hidden_dump_args(cmd.arg(color_arg().hide(true)))
}

/// Locate one instance section and print its header.
pub fn instance_command() -> Command {
    let cmd = Command::new("instance")
        .about("Locate an instance section by type and print its header")
        .override_usage(
            "\
  typelib instance <TYPE> --data <FILE>
  typelib instance <TYPE> --data <FILE> --indexed",
        )
        .after_help(
            r#"EXAMPLES:
  typelib instance Foo --data entities.bin.gz             # byte scan
  typelib instance 0x0B87D664 --data entities.bin.gz      # by hash
  typelib instance Foo --data entities.bin.gz --indexed   # section index"#,
        )
        .arg(type_arg())
        .arg(data_arg().required(true))
        .arg(names_arg())
        .arg(indexed_arg())
        .arg(color_arg());

    // Hidden unified flags
    with_hidden_dump_args(with_hidden_json_args(with_hidden_aux_args(
        cmd.arg(schema_arg().hide(true)).arg(width_arg().hide(true)),
    )))
}
