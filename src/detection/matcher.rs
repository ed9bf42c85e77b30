//! Hash matching against the signature database.

use crate::core::error::Result;
use crate::detection::record::FileRecord;
use crate::detection::signature::{Signature, SignatureDatabase};
use crate::utils::hash::HashCalculator;
use std::path::Path;
use std::sync::Arc;

/// Signature-based matcher over a shared, read-only database.
#[derive(Debug, Clone)]
pub struct SignatureMatcher {
    db: Arc<SignatureDatabase>,
}

impl SignatureMatcher {
    /// Create a new signature matcher.
    pub fn new(db: Arc<SignatureDatabase>) -> Self {
        Self { db }
    }

    /// Return the first signature whose digest equals `digest`, ignoring case.
    pub fn match_digest(&self, digest: &str) -> Option<&Signature> {
        self.db.iter().find(|sig| sig.matches_sha256(digest))
    }

    /// Hash a file and match it against the database.
    pub fn match_file(&self, path: &Path) -> Result<Option<&Signature>> {
        let digest = HashCalculator::sha256_file(path)?;
        Ok(self.match_digest(&digest))
    }

    /// Match a file record, computing its digest if needed.
    pub fn match_record(&self, record: &FileRecord) -> Result<Option<&Signature>> {
        let digest = record.digest()?;
        Ok(self.match_digest(digest))
    }

    /// Get the underlying database.
    pub fn database(&self) -> &SignatureDatabase {
        &self.db
    }
}
