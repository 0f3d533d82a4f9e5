use std::path::PathBuf;

use typelib_core::{Colors, PointerWidth};
use typelib_format::{CatalogParser, dump};
use typelib_lib::{AssetError, load_names, read_blob};

use super::{CommandError, finish};

pub struct TypesArgs {
    pub schema: PathBuf,
    pub names: Option<PathBuf>,
    pub width: PointerWidth,
    pub filter: Option<String>,
    pub color: bool,
}

pub fn run(args: TypesArgs) {
    finish(execute(&args));
}

pub fn execute(args: &TypesArgs) -> Result<String, CommandError> {
    let schema = read_blob(&args.schema)?;
    let names = load_names(args.names.as_deref())?;
    let catalog = CatalogParser::new(args.width)
        .with_names(&names)
        .parse(&schema)
        .map_err(|source| AssetError::Decode {
            what: "schema",
            source,
        })?;

    Ok(dump(&catalog, args.filter.as_deref(), Colors::new(args.color)))
}
