//! Configuration management.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default signature list file, relative to the working directory.
pub const DEFAULT_SIGNATURE_FILE: &str = "signature_database.txt";

/// Default blacklist function file, relative to the working directory.
pub const DEFAULT_BLACKLIST_FILE: &str = "blacklist_function.txt";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Scan-related settings
    #[serde(default)]
    pub scan: ScanConfig,
    /// Detection settings
    #[serde(default)]
    pub detection: DetectionConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigLoad(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::ConfigSave(format!("Failed to create config directory: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| Error::ConfigSave(format!("Failed to write config file: {}", e)))
    }

    /// Load configuration from `path`, falling back to defaults.
    ///
    /// A missing file is not written back: scanning a folder should not
    /// leave files behind. A file that exists but cannot be loaded yields
    /// the defaults together with the load error, so the caller can report
    /// it once logging is up.
    pub fn load_or_default(path: &Path) -> (Self, Option<Error>) {
        if !path.exists() {
            return (Self::default(), None);
        }

        match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        Self::data_dir().join("config.json")
    }

    /// Get the application data directory.
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("simple-antivirus")
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.scan.scan_threads == 0 {
            return Err(Error::ConfigInvalid {
                field: "scan.scan_threads".to_string(),
                message: "Must be greater than 0".to_string(),
            });
        }

        let ext = &self.detection.executable_extension;
        if ext.len() < 2 || !ext.starts_with('.') {
            return Err(Error::ConfigInvalid {
                field: "detection.executable_extension".to_string(),
                message: "Must start with '.' followed by the extension".to_string(),
            });
        }

        if self
            .detection
            .suspicious_name_tokens
            .iter()
            .all(|t| t.trim().is_empty())
        {
            return Err(Error::ConfigInvalid {
                field: "detection.suspicious_name_tokens".to_string(),
                message: "At least one non-empty token is required".to_string(),
            });
        }

        Ok(())
    }
}

/// Scan-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Whether to follow symbolic links while walking
    pub follow_symlinks: bool,
    /// Path fragments to exclude from scanning
    pub exclude_paths: Vec<String>,
    /// Skip files larger than this size in MB (0 = no limit)
    pub max_file_size_mb: u64,
    /// Number of parallel scan workers (1 = sequential)
    pub scan_threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            exclude_paths: Vec::new(),
            max_file_size_mb: 0,
            scan_threads: 1,
        }
    }
}

impl ScanConfig {
    /// Size limit in bytes, if any.
    pub fn max_file_size_bytes(&self) -> Option<u64> {
        (self.max_file_size_mb > 0).then(|| self.max_file_size_mb * 1024 * 1024)
    }
}

/// Detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Run the filename and import-table heuristics
    pub heuristic_enabled: bool,
    /// Signature list (`name,sha256` per line)
    pub signature_path: PathBuf,
    /// Blacklisted import names (one per line)
    pub blacklist_path: PathBuf,
    /// Substrings that make an executable's file name suspicious
    pub suspicious_name_tokens: Vec<String>,
    /// Extension that marks a file name as executable
    pub executable_extension: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            heuristic_enabled: true,
            signature_path: PathBuf::from(DEFAULT_SIGNATURE_FILE),
            blacklist_path: PathBuf::from(DEFAULT_BLACKLIST_FILE),
            suspicious_name_tokens: vec![
                "crack".to_string(),
                "keygen".to_string(),
                "hack".to_string(),
            ],
            executable_extension: ".exe".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
