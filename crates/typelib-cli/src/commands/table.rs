use typelib_core::NameHash;
use typelib_lib::{AssetSet, AssetSources, ComponentSpec, ComponentTable, Lookup};

use super::{CommandError, finish};

pub struct TableArgs {
    pub sources: AssetSources,
    pub spec: ComponentSpec,
    /// Single resource to read; the whole table when unset.
    pub resource: Option<NameHash>,
    pub lookup: Lookup,
    pub compact: bool,
}

pub fn run(args: TableArgs) {
    finish(execute(&args));
}

pub fn execute(args: &TableArgs) -> Result<String, CommandError> {
    let assets = AssetSet::load(&args.sources)?;
    tracing::debug!(
        table = %args.spec.name,
        lookup = ?args.lookup,
        resource = ?args.resource,
        "reading component table"
    );
    render(&assets, args)
}

/// Read the table out of loaded assets and encode it as JSON.
pub fn render(assets: &AssetSet, args: &TableArgs) -> Result<String, CommandError> {
    let table = ComponentTable::from_asset_set(assets, args.spec.clone(), args.lookup)?;
    let value = match args.resource {
        Some(resource) => table.read_one(resource)?.to_display(assets)?,
        None => table.to_display()?,
    };

    let mut out = if args.compact {
        serde_json::to_string(&value)?
    } else {
        serde_json::to_string_pretty(&value)?
    };
    out.push('\n');
    Ok(out)
}
