//! Signature database types and the line-oriented signature loader.
//!
//! The on-disk format is plain text with one `virusName,hexDigest` row per
//! line. Rows that do not split into exactly two comma-separated fields are
//! skipped.

use crate::core::error::{Error, Result};
use crate::utils::hash::HashCalculator;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A known (virus name, digest) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Virus name (unique within a database)
    pub name: String,
    /// Expected SHA-256 digest, hex, any letter case
    pub sha256: String,
}

impl Signature {
    /// Create a new signature.
    pub fn new(name: impl Into<String>, sha256: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sha256: sha256.into(),
        }
    }

    /// Check if this signature matches a given SHA-256 digest.
    pub fn matches_sha256(&self, digest: &str) -> bool {
        self.sha256.eq_ignore_ascii_case(digest)
    }

    /// Parse one `name,digest` row. `line` is 1-based and only used for
    /// error reporting.
    pub fn parse_row(line: usize, row: &str) -> Result<Self> {
        let malformed = || Error::MalformedDatabaseRow {
            line,
            content: row.to_string(),
        };

        let mut fields = row.split(',');
        let (name, digest) = match (fields.next(), fields.next(), fields.next()) {
            (Some(name), Some(digest), None) => (name.trim(), digest.trim()),
            _ => return Err(malformed()),
        };

        if name.is_empty() || digest.is_empty() {
            return Err(malformed());
        }

        Ok(Self::new(name, digest))
    }
}

/// Mapping from virus name to expected digest.
///
/// Insertion order is kept so lookups report the first matching entry in
/// file order. Re-inserting a name replaces its digest in place.
#[derive(Debug, Clone, Default)]
pub struct SignatureDatabase {
    signatures: Vec<Signature>,
    by_name: HashMap<String, usize>,
}

impl SignatureDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a database from a signature list file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::SignatureLoad(format!("{}: {}", path.display(), e)))?;

        let db = Self::parse(&contents);
        log::info!(
            "Loaded {} signature(s) from {}",
            db.len(),
            path.display()
        );
        Ok(db)
    }

    /// Parse a signature list. Malformed rows are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut db = Self::new();
        let mut skipped = 0usize;

        for (idx, row) in contents.lines().enumerate() {
            if row.trim().is_empty() {
                continue;
            }
            match Signature::parse_row(idx + 1, row) {
                Ok(sig) => {
                    if !HashCalculator::is_sha256_hex(&sig.sha256) {
                        log::warn!(
                            "Signature '{}' has a digest that is not SHA-256 hex and will never match",
                            sig.name
                        );
                    }
                    db.insert(sig);
                }
                Err(e) => {
                    log::debug!("Skipping row: {}", e);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            log::debug!("Skipped {} malformed signature row(s)", skipped);
        }

        db
    }

    /// Insert a signature, returning the digest it replaced.
    pub fn insert(&mut self, sig: Signature) -> Option<String> {
        match self.by_name.get(&sig.name) {
            Some(&idx) => Some(std::mem::replace(&mut self.signatures[idx].sha256, sig.sha256)),
            None => {
                self.by_name.insert(sig.name.clone(), self.signatures.len());
                self.signatures.push(sig);
                None
            }
        }
    }

    /// Look up a signature by virus name.
    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.by_name.get(name).map(|&idx| &self.signatures[idx])
    }

    /// Iterate signatures in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Signature> {
        self.signatures.iter()
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

impl FromIterator<Signature> for SignatureDatabase {
    fn from_iter<I: IntoIterator<Item = Signature>>(iter: I) -> Self {
        let mut db = Self::new();
        for sig in iter {
            db.insert(sig);
        }
        db
    }
}

impl<'a> IntoIterator for &'a SignatureDatabase {
    type Item = &'a Signature;
    type IntoIter = std::slice::Iter<'a, Signature>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
