//! Heuristic detection for files without a known signature.
//!
//! Two rules are evaluated in order, the first hit wins:
//! - file name: an executable whose name contains a suspicious token
//! - header + imports: an `MZ` image importing a blacklisted function
//!
//! A file matching neither rule is considered safe.

pub mod filename;
pub mod pe;

pub use filename::FileNameRule;
pub use pe::{ImportEntry, ImportInspector, ImportList};

use crate::core::config::DetectionConfig;
use crate::core::error::Result;
use crate::core::types::HeuristicReason;
use crate::detection::blacklist::BlacklistFunctionSet;
use crate::detection::record::FileRecord;
use std::path::Path;

/// Heuristic evaluator combining the file name and import table rules.
#[derive(Debug, Clone, Default)]
pub struct HeuristicEvaluator {
    file_name_rule: FileNameRule,
    inspector: ImportInspector,
}

impl HeuristicEvaluator {
    /// Create an evaluator with the default file name rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator from detection settings.
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            file_name_rule: FileNameRule::from_config(config),
            inspector: ImportInspector::new(),
        }
    }

    /// Replace the file name rule.
    pub fn with_file_name_rule(mut self, rule: FileNameRule) -> Self {
        self.file_name_rule = rule;
        self
    }

    /// Evaluate a file and return why it is suspicious, if it is.
    ///
    /// Only I/O failures are errors; an `MZ` file that does not parse as a
    /// PE image is treated as having no imports.
    pub fn evaluate(
        &self,
        record: &FileRecord,
        blacklist: &BlacklistFunctionSet,
    ) -> Result<Option<HeuristicReason>> {
        if let Some(token) = self.file_name_rule.check(record.path()) {
            return Ok(Some(HeuristicReason::SuspiciousFileName {
                token: token.to_string(),
            }));
        }

        if !pe::file_has_mz_magic(record.path())? {
            return Ok(None);
        }

        if blacklist.is_empty() {
            return Ok(None);
        }

        let imports = record.imports(&self.inspector)?;
        let hit = blacklist.iter().find(|name| imports.contains(name));

        Ok(hit.map(|function| HeuristicReason::BlacklistedImport {
            function: function.to_string(),
        }))
    }

    /// Boolean form of [`evaluate`](Self::evaluate). Unreadable files are not
    /// suspicious.
    pub fn is_suspicious(&self, path: &Path, blacklist: &BlacklistFunctionSet) -> bool {
        let record = FileRecord::new(path);
        match self.evaluate(&record, blacklist) {
            Ok(reason) => reason.is_some(),
            Err(e) => {
                log::debug!("Heuristic analysis skipped: {}", e);
                false
            }
        }
    }
}
