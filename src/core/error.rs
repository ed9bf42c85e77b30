//! Error types and result handling for the scanner.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for scanner operations.
#[derive(Error, Debug)]
pub enum Error {
    // ===== I/O Errors =====
    #[error("Failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to access directory: {path}")]
    DirectoryAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    // ===== Detection Errors =====
    #[error("Not a valid executable: {path} - {reason}")]
    MalformedExecutable { path: PathBuf, reason: String },

    #[error("Malformed database row {line}: {content:?}")]
    MalformedDatabaseRow { line: usize, content: String },

    #[error("Failed to load signatures: {0}")]
    SignatureLoad(String),

    #[error("Failed to load blacklist functions: {0}")]
    BlacklistLoad(String),

    // ===== Configuration Errors =====
    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),

    #[error("Failed to save configuration: {0}")]
    ConfigSave(String),

    #[error("Invalid configuration value: {field} - {message}")]
    ConfigInvalid { field: String, message: String },

    // ===== Concurrency Errors =====
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    // ===== Serialization Errors =====
    #[error("JSON serialization error")]
    JsonSerialize(#[from] serde_json::Error),

    // ===== Generic Errors =====
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl Error {
    /// Create a file read error.
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a malformed executable error.
    pub fn malformed_executable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::MalformedExecutable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a lock poisoned error.
    pub fn lock_poisoned(context: impl Into<String>) -> Self {
        Self::LockPoisoned {
            context: context.into(),
        }
    }

    /// Check if this error only affects a single file (scan can continue).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::FileRead { .. }
                | Error::MalformedExecutable { .. }
                | Error::MalformedDatabaseRow { .. }
        )
    }

    /// Get a user-friendly suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::PathNotFound(_) => Some("Check that the path exists and is accessible"),
            Error::NotADirectory(_) => Some("Pass a folder, not a single file"),
            Error::SignatureLoad(_) => {
                Some("Provide a signature list with one `name,sha256` row per line")
            }
            Error::BlacklistLoad(_) => {
                Some("Provide a blacklist file with one function name per line")
            }
            Error::ConfigLoad(_) | Error::ConfigInvalid { .. } => {
                Some("Check your configuration file for syntax errors or missing fields")
            }
            Error::LockPoisoned { .. } => Some("Internal error: restart the scan"),
            _ => None,
        }
    }

    /// Get the error category for logging.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::FileRead { .. }
            | Error::DirectoryAccess { .. }
            | Error::PathNotFound(_)
            | Error::NotADirectory(_)
            | Error::Io(_) => ErrorCategory::Io,

            Error::MalformedExecutable { .. } => ErrorCategory::Detection,

            Error::MalformedDatabaseRow { .. }
            | Error::SignatureLoad(_)
            | Error::BlacklistLoad(_) => ErrorCategory::Database,

            Error::ConfigLoad(_) | Error::ConfigSave(_) | Error::ConfigInvalid { .. } => {
                ErrorCategory::Configuration
            }

            Error::LockPoisoned { .. } => ErrorCategory::Concurrency,

            Error::JsonSerialize(_) => ErrorCategory::Serialization,

            Error::Internal(_) | Error::Other(_) => ErrorCategory::Other,
        }
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Io,
    Detection,
    Database,
    Configuration,
    Concurrency,
    Serialization,
    Other,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io => write!(f, "I/O"),
            Self::Detection => write!(f, "Detection"),
            Self::Database => write!(f, "Database"),
            Self::Configuration => write!(f, "Configuration"),
            Self::Concurrency => write!(f, "Concurrency"),
            Self::Serialization => write!(f, "Serialization"),
            Self::Other => write!(f, "Other"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PathNotFound(PathBuf::from("/test/path"));
        assert_eq!(err.to_string(), "Path not found: /test/path");

        let err = Error::malformed_executable("/tmp/a.exe", "bad header");
        assert_eq!(err.to_string(), "Not a valid executable: /tmp/a.exe - bad header");
    }

    #[test]
    fn test_recoverable_errors() {
        let err = Error::file_read(
            "/test",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_recoverable());
        assert_eq!(err.category(), ErrorCategory::Io);

        assert!(Error::malformed_executable("/x", "y").is_recoverable());
        assert!(!Error::SignatureLoad("missing".into()).is_recoverable());
        assert!(!Error::NotADirectory("/etc/hosts".into()).is_recoverable());
    }

    #[test]
    fn test_suggestions() {
        assert!(Error::PathNotFound("/nope".into()).suggestion().is_some());
        assert!(Error::Internal("x".into()).suggestion().is_none());
    }
}
