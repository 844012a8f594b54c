//! Alias table: maps an alternate token to a canonical command name.
//!
//! Validation (syntax, collisions) lives in [`CommandTable`](super::CommandTable),
//! which knows the registered names; this type only stores and resolves.

use std::collections::BTreeMap;

/// Mapping from alias to canonical command name.
#[derive(Debug, Clone, Default)]
pub struct Aliases {
    map: BTreeMap<String, String>,
}

impl Aliases {
    /// Resolves `token` to its canonical name, or returns it unchanged.
    ///
    /// Resolving a canonical name returns the name itself.
    pub fn resolve<'a>(&'a self, token: &'a str) -> &'a str {
        self.map.get(token).map(String::as_str).unwrap_or(token)
    }

    /// Returns the canonical name for an alias.
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.map.get(alias).map(String::as_str)
    }

    /// Iterates `(alias, canonical)` pairs in alias order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(a, n)| (a.as_str(), n.as_str()))
    }

    pub(crate) fn insert(&mut self, alias: impl Into<String>, name: impl Into<String>) {
        self.map.insert(alias.into(), name.into());
    }
}
