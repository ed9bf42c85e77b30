//! Blacklisted import function names.

use crate::core::error::{Error, Result};
use std::path::Path;

/// Set of imported function names considered suspicious.
///
/// Names compare ignoring ASCII case; the first spelling inserted is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlacklistFunctionSet {
    names: Vec<String>,
}

impl BlacklistFunctionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load names from a file, one per non-blank line.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::BlacklistLoad(format!("{}: {}", path.display(), e)))?;

        let set = Self::parse(&contents);
        log::info!(
            "Loaded {} blacklisted function(s) from {}",
            set.len(),
            path.display()
        );
        Ok(set)
    }

    /// Parse names, trimming whitespace and ignoring blank lines.
    pub fn parse(contents: &str) -> Self {
        contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    }

    /// Insert a name. Returns false if it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }

    /// Check membership ignoring ASCII case.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for BlacklistFunctionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}
