//! Lexical file name heuristic.

use crate::core::config::DetectionConfig;
use std::path::Path;

/// Flags executables whose base name contains a suspicious token
/// (crack, keygen and similar). No file content is read.
#[derive(Debug, Clone)]
pub struct FileNameRule {
    extension: String,
    tokens: Vec<String>,
}

impl Default for FileNameRule {
    fn default() -> Self {
        Self::from_config(&DetectionConfig::default())
    }
}

impl FileNameRule {
    /// Create a rule for `extension` (including the leading dot) and tokens.
    /// Both are matched against the lower-cased base name.
    pub fn new<I, S>(extension: &str, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extension: extension.to_lowercase(),
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &DetectionConfig) -> Self {
        Self::new(&config.executable_extension, &config.suspicious_name_tokens)
    }

    /// Return the first token found in an executable's base name.
    pub fn check(&self, path: &Path) -> Option<&str> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        if !name.ends_with(&self.extension) {
            return None;
        }
        self.tokens
            .iter()
            .find(|token| name.contains(token.as_str()))
            .map(String::as_str)
    }
}
