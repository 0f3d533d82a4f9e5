//! Human-readable catalog dump.
//!
//! Sections: `[header]`, `[types]`, `[enums]`. Entries are sorted by name so
//! output is stable across runs regardless of hash map order.

use std::fmt;

use typelib_core::Colors;

use crate::catalog::{Catalog, EnumDescriptor, MemberDescriptor, TypeDescriptor, TypeFlags};
use crate::type_ref::{Atom, Storage};

/// Render the catalog, optionally keeping only types and enums whose name
/// contains `filter` (case-insensitive).
pub fn dump(catalog: &Catalog, filter: Option<&str>, colors: Colors) -> String {
    CatalogDump::new(catalog, colors).filter(filter).to_string()
}

/// [`fmt::Display`] adapter behind [`dump`].
pub struct CatalogDump<'a> {
    catalog: &'a Catalog,
    filter: Option<String>,
    colors: Colors,
}

impl<'a> CatalogDump<'a> {
    pub fn new(catalog: &'a Catalog, colors: Colors) -> Self {
        Self {
            catalog,
            filter: None,
            colors,
        }
    }

    pub fn filter(mut self, filter: Option<&str>) -> Self {
        self.filter = filter.map(str::to_lowercase);
        self
    }

    fn matches(&self, name: &str) -> bool {
        match &self.filter {
            Some(f) => name.to_lowercase().contains(f.as_str()),
            None => true,
        }
    }

    fn sorted_types(&self) -> Vec<&'a TypeDescriptor> {
        let mut types: Vec<_> = self
            .catalog
            .types()
            .filter(|t| self.matches(&t.name))
            .collect();
        types.sort_by(|a, b| a.name.cmp(&b.name).then(a.hash.cmp(&b.hash)));
        types
    }

    fn sorted_enums(&self) -> Vec<&'a EnumDescriptor> {
        let mut enums: Vec<_> = self
            .catalog
            .enums()
            .filter(|e| self.matches(&e.name))
            .collect();
        enums.sort_by(|a, b| a.name.cmp(&b.name).then(a.hash.cmp(&b.hash)));
        enums
    }

    fn fmt_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.colors;
        writeln!(f, "{}[header]{}", c.blue, c.reset)?;
        writeln!(f, "version = {}", self.catalog.version())?;
        writeln!(f, "width = {}", self.catalog.pointer_width())?;
        writeln!(f, "types = {}", self.catalog.type_count())?;
        writeln!(f, "enums = {}", self.catalog.enum_count())?;
        writeln!(f)
    }

    fn fmt_types(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.colors;
        writeln!(f, "{}[types]{}", c.blue, c.reset)?;
        for t in self.sorted_types() {
            write!(
                f,
                "{}{}{} {}{}{} size={} align={}",
                c.blue, t.name, c.reset, c.yellow, t.hash, c.reset, t.size, t.alignment
            )?;
            if t.flags.0 != 0 {
                write!(f, " flags={}", flag_names(t.flags))?;
            }
            self.fmt_comment(f, &t.comment)?;

            let w = digits(t.size);
            for m in &t.members {
                self.fmt_member(f, m, w)?;
            }
        }
        writeln!(f)
    }

    fn fmt_member(
        &self,
        f: &mut fmt::Formatter<'_>,
        m: &MemberDescriptor,
        w: usize,
    ) -> fmt::Result {
        let c = self.colors;
        write!(
            f,
            "  {}+{:0w$}{} {}{}{}: {}",
            c.dim,
            m.offset,
            c.reset,
            c.green,
            m.name,
            c.reset,
            self.member_type(m)
        )?;
        if let Some(default) = &m.default {
            write!(f, " = [{}]", hex_bytes(default))?;
        }
        self.fmt_comment(f, &m.comment)
    }

    fn fmt_enums(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.colors;
        writeln!(f, "{}[enums]{}", c.blue, c.reset)?;
        for e in self.sorted_enums() {
            let storage = e.storage.underlying().primitive_name().unwrap_or("?");
            write!(
                f,
                "{}{}{} {}{}{} : {storage}",
                c.blue, e.name, c.reset, c.yellow, e.hash, c.reset
            )?;
            self.fmt_comment(f, &e.comment)?;

            for v in &e.values {
                write!(f, "  {}{}{} = {}", c.green, v.name, c.reset, v.value)?;
                let others: Vec<_> = v
                    .aliases
                    .iter()
                    .filter(|a| **a != v.name)
                    .map(String::as_str)
                    .collect();
                if !others.is_empty() {
                    write!(f, " ({})", others.join(", "))?;
                }
                self.fmt_comment(f, &v.comment)?;
            }
        }
        Ok(())
    }

    /// Trailing `; comment` and the line break.
    fn fmt_comment(&self, f: &mut fmt::Formatter<'_>, comment: &str) -> fmt::Result {
        let c = self.colors;
        if comment.is_empty() {
            return writeln!(f);
        }
        writeln!(f, "  {}; {comment}{}", c.dim, c.reset)
    }

    fn member_type(&self, m: &MemberDescriptor) -> String {
        let storage = m.type_ref.storage;
        let elem = if storage == Storage::Struct || storage.is_enum() {
            self.catalog.name_of(m.ref_type)
        } else {
            storage.primitive_name().unwrap_or("?").to_owned()
        };
        match m.type_ref.atom {
            Atom::Plain => elem,
            Atom::Array => format!("{elem}[]"),
            Atom::InlineArray => format!("{elem}[{}]", m.type_ref.extent),
            Atom::Bitfield => format!("{elem}:{}", m.type_ref.extent),
        }
    }
}

impl fmt::Display for CatalogDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_header(f)?;
        self.fmt_types(f)?;
        self.fmt_enums(f)
    }
}

fn flag_names(flags: TypeFlags) -> String {
    let mut names = Vec::new();
    if flags.has_subdata() {
        names.push("has_subdata");
    }
    if flags.is_external() {
        names.push("external");
    }
    if flags.is_union() {
        names.push("union");
    }
    if flags.verify_size() {
        names.push("verify_size");
    }
    let unknown = flags.0 & !0xF;
    let mut out = names.join("|");
    if unknown != 0 {
        if !out.is_empty() {
            out.push('|');
        }
        out.push_str(&format!("0x{unknown:X}"));
    }
    out
}

/// Decimal digits needed for offsets below `size`.
fn digits(size: u32) -> usize {
    size.saturating_sub(1).max(1).ilog10() as usize + 1
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
