use typelib_core::hash;

pub struct HashArgs {
    pub symbols: Vec<String>,
}

pub fn run(args: HashArgs) {
    print!("{}", render(&args.symbols));
}

/// One `0x%08X  name` line per symbol.
pub fn render(symbols: &[String]) -> String {
    symbols
        .iter()
        .map(|name| format!("{}  {name}\n", hash(name)))
        .collect()
}
