//! Core type definitions shared by the detection engine and the scanner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Why the heuristic evaluator flagged a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum HeuristicReason {
    /// Executable file name containing a suspicious token
    SuspiciousFileName { token: String },
    /// PE import table references a blacklisted function
    BlacklistedImport { function: String },
}

impl std::fmt::Display for HeuristicReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeuristicReason::SuspiciousFileName { token } => {
                write!(f, "suspicious file name (contains '{}')", token)
            }
            HeuristicReason::BlacklistedImport { function } => {
                write!(f, "imports blacklisted function {}", function)
            }
        }
    }
}

/// What kind of detection a finding represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FindingKind {
    /// Content digest matched a known signature
    SignatureMatch { virus_name: String },
    /// Heuristic rules consider the file suspicious
    HeuristicSuspicious { reason: HeuristicReason },
}

/// One reported detection for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Scanned file
    pub path: PathBuf,
    /// Detection result
    pub kind: FindingKind,
}

impl Finding {
    /// Create a signature match finding.
    pub fn signature(path: impl Into<PathBuf>, virus_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: FindingKind::SignatureMatch {
                virus_name: virus_name.into(),
            },
        }
    }

    /// Create a heuristic finding.
    pub fn heuristic(path: impl Into<PathBuf>, reason: HeuristicReason) -> Self {
        Self {
            path: path.into(),
            kind: FindingKind::HeuristicSuspicious { reason },
        }
    }

    /// Final path component, or the whole path when it has none.
    pub fn file_name(&self) -> String {
        display_name(&self.path)
    }

    pub fn is_signature_match(&self) -> bool {
        matches!(self.kind, FindingKind::SignatureMatch { .. })
    }
}

/// Final path component of `path` as displayed in alerts.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Status of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    /// Scan is in progress
    Running,
    /// Scan completed successfully
    Completed,
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanStatus::Running => write!(f, "Running"),
            ScanStatus::Completed => write!(f, "Completed"),
        }
    }
}

/// Summary of a completed scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Current status
    pub status: ScanStatus,
    /// Start time
    pub start_time: DateTime<Utc>,
    /// End time
    pub end_time: Option<DateTime<Utc>>,
    /// Files processed (including the ones that failed)
    pub files_scanned: u64,
    /// Files that could not be hashed or read
    pub errors: u64,
    /// All findings, in the order they were reported
    pub findings: Vec<Finding>,
}

impl Default for ScanSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanSummary {
    /// Create a new running scan summary.
    pub fn new() -> Self {
        Self {
            status: ScanStatus::Running,
            start_time: Utc::now(),
            end_time: None,
            files_scanned: 0,
            errors: 0,
            findings: Vec::new(),
        }
    }

    /// Mark the scan as completed.
    pub fn complete(&mut self) {
        self.status = ScanStatus::Completed;
        self.end_time = Some(Utc::now());
    }

    /// Number of signature matches.
    pub fn signature_matches(&self) -> usize {
        self.findings.iter().filter(|f| f.is_signature_match()).count()
    }

    /// Number of heuristic flags.
    pub fn heuristic_flags(&self) -> usize {
        self.findings.len() - self.signature_matches()
    }

    /// Duration of the scan in seconds, if finished.
    pub fn duration_secs(&self) -> Option<i64> {
        self.end_time
            .map(|end| (end - self.start_time).num_seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_file_name() {
        let finding = Finding::signature("/data/samples/evil.exe", "Trojan.X");
        assert_eq!(finding.file_name(), "evil.exe");
        assert!(finding.is_signature_match());
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = ScanSummary::new();
        summary.findings.push(Finding::signature("a.exe", "Virus.A"));
        summary.findings.push(Finding::heuristic(
            "keygen.exe",
            HeuristicReason::SuspiciousFileName {
                token: "keygen".into(),
            },
        ));
        summary.complete();

        assert_eq!(summary.status, ScanStatus::Completed);
        assert_eq!(summary.signature_matches(), 1);
        assert_eq!(summary.heuristic_flags(), 1);
        assert!(summary.duration_secs().is_some());
    }

    #[test]
    fn test_finding_serialization() {
        let finding = Finding::heuristic(
            "/tmp/tool.exe",
            HeuristicReason::BlacklistedImport {
                function: "VirtualAlloc".into(),
            },
        );
        let json = serde_json::to_string(&finding).unwrap();
        assert!(json.contains("\"type\":\"heuristic_suspicious\""));
        assert!(json.contains("\"rule\":\"blacklisted_import\""));

        let parsed: Finding = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, finding);
    }
}
