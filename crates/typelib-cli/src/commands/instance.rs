use std::fmt::Write as _;
use std::path::PathBuf;

use typelib_core::{Colors, KnownNames, NameHash};
use typelib_format::{DecodeError, InstanceHeader, InstanceIndex, find_instance};
use typelib_lib::{Lookup, load_names, read_blob};

use super::{CommandError, finish};

pub struct InstanceArgs {
    pub type_hash: NameHash,
    pub data: PathBuf,
    pub names: Option<PathBuf>,
    pub lookup: Lookup,
    pub color: bool,
}

pub fn run(args: InstanceArgs) {
    finish(execute(&args));
}

pub fn execute(args: &InstanceArgs) -> Result<String, CommandError> {
    let blob = read_blob(&args.data)?;
    let names = load_names(args.names.as_deref())?;
    let colors = Colors::new(args.color);

    match args.lookup {
        Lookup::Scan => {
            let (header, _) = find_instance(&blob, args.type_hash)?;
            Ok(render(&header, None, &names, colors))
        }
        Lookup::Indexed => {
            let index = InstanceIndex::build(&blob);
            let section = index
                .locate(args.type_hash)
                .ok_or(DecodeError::PatternNotFound {
                    hash: args.type_hash,
                })?;
            Ok(render(&section.header, Some(section.offset), &names, colors))
        }
    }
}

/// Header fields, one per line. The section offset is only known to the index.
pub fn render(
    header: &InstanceHeader,
    offset: Option<usize>,
    names: &KnownNames,
    colors: Colors,
) -> String {
    let Colors {
        blue,
        yellow,
        dim,
        reset,
        ..
    } = colors;
    let name = match names.get(header.type_hash) {
        Some(name) => name.to_owned(),
        None => header.type_hash.to_string(),
    };

    let mut out = String::new();
    let _ = writeln!(out, "{blue}{name}{reset} {yellow}{}{reset}", header.type_hash);
    if let Some(offset) = offset {
        let _ = writeln!(out, "  offset    {offset}");
    }
    let _ = writeln!(out, "  version   {}", header.version);
    let _ = writeln!(out, "  size      {}", header.size);
    let _ = writeln!(out, "  width     {}", header.pointer_width);
    let _ = writeln!(out, "  {dim}sentinel  0x{:08X}{reset}", header.sentinel);
    out
}
