mod cli;
mod commands;

use cli::{HashParams, InstanceParams, TableParams, TypesParams, build_cli};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = build_cli().get_matches();
    let Some((name, m)) = matches.subcommand() else {
        unreachable!("clap should have caught this")
    };
    init_logging(m.get_count("verbose"));

    match name {
        "hash" => {
            let params = HashParams::from_matches(m);
            commands::hash::run(params.into());
        }
        "types" => {
            let params = TypesParams::from_matches(m);
            commands::types::run(params.into());
        }
        "table" => {
            let params = TableParams::from_matches(m);
            commands::table::run(params.into());
        }
        "instance" => {
            let params = InstanceParams::from_matches(m);
            commands::instance::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the default `warn` level.
fn init_logging(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
