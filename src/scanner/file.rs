//! File scanner combining signature matching and heuristic analysis.

use crate::core::config::DetectionConfig;
use crate::core::error::{Error, Result};
use crate::core::types::{Finding, ScanSummary};
use crate::detection::{
    BlacklistFunctionSet, FileRecord, HeuristicEvaluator, SignatureDatabase, SignatureMatcher,
};
use crate::scanner::sink::FindingSink;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Upper bound on parallel scan workers.
pub const MAX_WORKERS: usize = 16;

const RESULT_CHANNEL_CAPACITY: usize = 256;

/// Outcome of one file, sent from a worker to the consumer.
#[derive(Debug)]
struct ScanEvent {
    path: PathBuf,
    outcome: Result<Vec<Finding>>,
}

/// Scans files against a signature database and the heuristic rules.
///
/// The database and blacklist are shared read-only; cloning a scanner is
/// cheap and every clone sees the same data.
#[derive(Debug, Clone)]
pub struct Scanner {
    matcher: SignatureMatcher,
    blacklist: Arc<BlacklistFunctionSet>,
    evaluator: HeuristicEvaluator,
    heuristics_enabled: bool,
}

impl Scanner {
    /// Create a scanner with heuristics enabled and the default file name rule.
    pub fn new(db: Arc<SignatureDatabase>, blacklist: Arc<BlacklistFunctionSet>) -> Self {
        Self {
            matcher: SignatureMatcher::new(db),
            blacklist,
            evaluator: HeuristicEvaluator::new(),
            heuristics_enabled: true,
        }
    }

    /// Create a scanner using the detection settings.
    pub fn from_config(
        db: Arc<SignatureDatabase>,
        blacklist: Arc<BlacklistFunctionSet>,
        config: &DetectionConfig,
    ) -> Self {
        Self::new(db, blacklist)
            .with_evaluator(HeuristicEvaluator::from_config(config))
            .with_heuristics(config.heuristic_enabled)
    }

    pub fn with_heuristics(mut self, enabled: bool) -> Self {
        self.heuristics_enabled = enabled;
        self
    }

    pub fn with_evaluator(mut self, evaluator: HeuristicEvaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    pub fn heuristics_enabled(&self) -> bool {
        self.heuristics_enabled
    }

    /// Scan a single file.
    ///
    /// Returns the signature finding (if any) followed by the heuristic
    /// finding (if any).
    pub fn scan_file(&self, path: &Path) -> Result<Vec<Finding>> {
        let record = FileRecord::new(path);
        let mut findings = Vec::new();

        if let Some(sig) = self.matcher.match_record(&record)? {
            log::info!("Signature match: {} in {}", sig.name, path.display());
            findings.push(Finding::signature(path, sig.name.as_str()));
        }

        if self.heuristics_enabled {
            if let Some(reason) = self.evaluator.evaluate(&record, &self.blacklist)? {
                log::info!("Heuristic flag: {} ({})", path.display(), reason);
                findings.push(Finding::heuristic(path, reason));
            }
        }

        Ok(findings)
    }

    /// Lazily scan `paths`, yielding findings in path order.
    pub fn scan<I>(&self, paths: I) -> Findings<'_, I::IntoIter>
    where
        I: IntoIterator<Item = PathBuf>,
    {
        Findings {
            scanner: self,
            paths: paths.into_iter(),
            pending: Vec::new().into_iter(),
        }
    }

    /// Scan `paths` one after another, reporting to `sink`.
    pub fn scan_with_sink<I, S>(&self, paths: I, sink: &mut S) -> ScanSummary
    where
        I: IntoIterator<Item = PathBuf>,
        S: FindingSink + ?Sized,
    {
        let mut summary = ScanSummary::new();

        for path in paths {
            sink.file_started(&path);
            let outcome = self.scan_file(&path);
            record_outcome(&mut summary, sink, &path, outcome);
        }

        finish(&mut summary);
        summary
    }

    /// Scan `paths` on a pool of blocking workers.
    ///
    /// Files are taken from a shared queue; results are reported to `sink`
    /// from the calling task in completion order.
    pub async fn scan_parallel<I, S>(
        &self,
        paths: I,
        workers: usize,
        sink: &mut S,
    ) -> Result<ScanSummary>
    where
        I: IntoIterator<Item = PathBuf>,
        S: FindingSink + ?Sized,
    {
        let mut summary = ScanSummary::new();

        let file_queue: Arc<Mutex<VecDeque<PathBuf>>> =
            Arc::new(Mutex::new(paths.into_iter().collect()));
        let total_files = file_queue
            .lock()
            .map_err(|_| Error::lock_poisoned("file queue (count)"))?
            .len();
        log::info!("Found {} files to scan", total_files);

        let (tx, mut rx) = mpsc::channel::<ScanEvent>(RESULT_CHANNEL_CAPACITY);

        let num_workers = workers.clamp(1, MAX_WORKERS);
        let scanner = Arc::new(self.clone());
        let mut handles = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let queue = Arc::clone(&file_queue);
            let scanner = Arc::clone(&scanner);
            let tx = tx.clone();

            let handle = tokio::task::spawn_blocking(move || loop {
                let next = match queue.lock() {
                    Ok(mut q) => q.pop_front(),
                    Err(_) => {
                        log::error!("File queue lock poisoned in worker");
                        break;
                    }
                };

                let Some(path) = next else {
                    break;
                };

                let outcome = scanner.scan_file(&path);
                if tx.blocking_send(ScanEvent { path, outcome }).is_err() {
                    break;
                }
            });

            handles.push(handle);
        }

        // Drop the sender so the channel closes when workers finish
        drop(tx);

        while let Some(event) = rx.recv().await {
            sink.file_started(&event.path);
            record_outcome(&mut summary, sink, &event.path, event.outcome);
        }

        for handle in handles {
            handle
                .await
                .map_err(|e| Error::Internal(format!("Scan worker failed: {}", e)))?;
        }

        finish(&mut summary);
        Ok(summary)
    }
}

fn record_outcome<S>(
    summary: &mut ScanSummary,
    sink: &mut S,
    path: &Path,
    outcome: Result<Vec<Finding>>,
) where
    S: FindingSink + ?Sized,
{
    summary.files_scanned += 1;
    match outcome {
        Ok(findings) => {
            for finding in findings {
                sink.finding(&finding);
                summary.findings.push(finding);
            }
        }
        Err(e) => {
            log::warn!("Skipping {} ({} error): {}", path.display(), e.category(), e);
            summary.errors += 1;
            sink.file_failed(path, &e);
        }
    }
}

fn finish(summary: &mut ScanSummary) {
    summary.complete();
    log::info!(
        "Scan completed: {} files scanned, {} signature matches, {} heuristic flags, {} errors",
        summary.files_scanned,
        summary.signature_matches(),
        summary.heuristic_flags(),
        summary.errors
    );
}

/// Lazy iterator over the findings of a sequence of files.
///
/// Files that cannot be read are logged and contribute no findings.
pub struct Findings<'a, I> {
    scanner: &'a Scanner,
    paths: I,
    pending: std::vec::IntoIter<Finding>,
}

impl<I> Iterator for Findings<'_, I>
where
    I: Iterator<Item = PathBuf>,
{
    type Item = Finding;

    fn next(&mut self) -> Option<Finding> {
        loop {
            if let Some(finding) = self.pending.next() {
                return Some(finding);
            }

            let path = self.paths.next()?;
            match self.scanner.scan_file(&path) {
                Ok(findings) => self.pending = findings.into_iter(),
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }
    }
}
