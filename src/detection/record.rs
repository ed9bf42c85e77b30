//! Per-file scan state.

use crate::core::error::{Error, Result};
use crate::detection::heuristic::pe::{ImportInspector, ImportList};
use crate::utils::hash::HashCalculator;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// A file being scanned, with its digest and import list computed on first
/// use and cached until the record is dropped.
///
/// Records live for exactly one file's processing and are never shared
/// between files or threads.
#[derive(Debug)]
pub struct FileRecord {
    path: PathBuf,
    digest: OnceCell<String>,
    imports: OnceCell<ImportList>,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            digest: OnceCell::new(),
            imports: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// SHA-256 digest of the file contents, uppercase hex.
    pub fn digest(&self) -> Result<&str> {
        if let Some(digest) = self.digest.get() {
            return Ok(digest);
        }
        let digest = HashCalculator::sha256_file(&self.path)?;
        Ok(self.digest.get_or_init(|| digest))
    }

    /// Whether the import table has been looked at for this file.
    pub fn has_parsed_imports(&self) -> bool {
        self.imports.get().is_some()
    }

    /// Imported functions of the file.
    ///
    /// An image that cannot be parsed yields an empty list; only I/O
    /// failures are returned as errors.
    pub fn imports(&self, inspector: &ImportInspector) -> Result<&ImportList> {
        if let Some(imports) = self.imports.get() {
            return Ok(imports);
        }
        let imports = match inspector.imports(&self.path) {
            Ok(imports) => imports,
            Err(Error::MalformedExecutable { reason, .. }) => {
                log::debug!("{}: not a valid executable ({})", self.path.display(), reason);
                ImportList::default()
            }
            Err(e) => return Err(e),
        };
        Ok(self.imports.get_or_init(|| imports))
    }
}
