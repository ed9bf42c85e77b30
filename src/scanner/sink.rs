//! Destinations for scan progress and findings.

use crate::core::error::{Error, ErrorCategory};
use crate::core::types::{Finding, FindingKind};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Receives scan events as they happen.
pub trait FindingSink {
    /// A file is being scanned. Sequential scans call this before the file
    /// is read, parallel scans once its result is in.
    fn file_started(&mut self, _path: &Path) {}

    /// A detection was made.
    fn finding(&mut self, finding: &Finding);

    /// A file could not be scanned and produced no findings.
    fn file_failed(&mut self, _path: &Path, _error: &Error) {}
}

/// Progress line printed for every scanned file.
pub fn progress_line(path: &Path) -> String {
    format!("Scan file: {}", path.display())
}

/// Alert line printed for a finding.
pub fn alert_line(finding: &Finding) -> String {
    match &finding.kind {
        FindingKind::SignatureMatch { virus_name } => format!(
            "Alert: {} terdeteksi sebagai virus! - Virus Name: {}",
            finding.file_name(),
            virus_name
        ),
        FindingKind::HeuristicSuspicious { .. } => format!(
            "Alert: {} dianggap mencurigakan berdasarkan analisis heuristik.",
            finding.file_name()
        ),
    }
}

/// Writes progress and alert lines to a writer (stdout by default).
pub struct ConsoleSink<W: Write = io::Stdout> {
    out: W,
    show_progress: bool,
}

impl ConsoleSink<io::Stdout> {
    /// Console sink printing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            show_progress: true,
        }
    }

    /// Enable or disable the per-file progress line.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            log::warn!("Failed to write scan output: {}", e);
        }
    }
}

impl<W: Write> FindingSink for ConsoleSink<W> {
    fn file_started(&mut self, path: &Path) {
        if self.show_progress {
            self.emit(&progress_line(path));
        }
    }

    fn finding(&mut self, finding: &Finding) {
        self.emit(&alert_line(finding));
    }
}

/// Keeps everything in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub scanned: Vec<PathBuf>,
    pub findings: Vec<Finding>,
    pub failed: Vec<(PathBuf, ErrorCategory)>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FindingSink for CollectingSink {
    fn file_started(&mut self, path: &Path) {
        self.scanned.push(path.to_path_buf());
    }

    fn finding(&mut self, finding: &Finding) {
        self.findings.push(finding.clone());
    }

    fn file_failed(&mut self, path: &Path, error: &Error) {
        self.failed.push((path.to_path_buf(), error.category()));
    }
}
