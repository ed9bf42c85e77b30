//! Malware detection engines.
//!
//! This module provides two independent detection methods:
//! - Signature-based detection (SHA-256 digest matching)
//! - Heuristic analysis (file name tokens, PE import blacklist)

pub mod blacklist;
pub mod heuristic;
pub mod matcher;
pub mod record;
pub mod signature;

pub use blacklist::BlacklistFunctionSet;
pub use heuristic::{FileNameRule, HeuristicEvaluator, ImportEntry, ImportInspector, ImportList};
pub use matcher::SignatureMatcher;
pub use record::FileRecord;
pub use signature::{Signature, SignatureDatabase};
