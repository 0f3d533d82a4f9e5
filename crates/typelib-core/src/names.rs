//! Well-known symbol names.
//!
//! Shipped schemas may carry a stripped (empty) string pool. Names are then
//! recovered by hashing a static list of symbol names and looking hashes up in
//! the resulting dictionary.

use indexmap::IndexMap;

use crate::hash::{NameHash, hash};

/// Dictionary from [`NameHash`] to the symbol name it was computed from.
///
/// Insertion order is preserved so listings match the source list.
#[derive(Debug, Clone, Default)]
pub struct KnownNames {
    names: IndexMap<NameHash, String>,
}

impl KnownNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a newline-delimited symbol list.
    ///
    /// Lines are trimmed. Blank lines and `#` comments are skipped.
    pub fn from_lines(text: &str) -> Self {
        let mut names = Self::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            names.insert(line);
        }
        tracing::debug!(count = names.len(), "built well-known name dictionary");
        names
    }

    /// Add a name, returning its hash.
    ///
    /// The first spelling registered for a hash is kept.
    pub fn insert(&mut self, name: &str) -> NameHash {
        let h = hash(name);
        if h.is_unset() {
            return h;
        }
        if let Some(existing) = self.names.get(&h) {
            if existing != name {
                tracing::debug!(
                    %h,
                    kept = %existing,
                    dropped = name,
                    "hash collision in name list"
                );
            }
            return h;
        }
        self.names.insert(h, name.to_owned());
        h
    }

    pub fn get(&self, h: NameHash) -> Option<&str> {
        self.names.get(&h).map(String::as_str)
    }

    pub fn contains(&self, h: NameHash) -> bool {
        self.names.contains_key(&h)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NameHash, &str)> {
        self.names.iter().map(|(h, s)| (*h, s.as_str()))
    }
}

impl<'a> FromIterator<&'a str> for KnownNames {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut names = Self::new();
        for name in iter {
            names.insert(name);
        }
        names
    }
}
