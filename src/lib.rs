//! simple-antivirus: folder scanning with hash signatures and PE heuristics
//!
//! Every file under a folder is hashed with SHA-256 and compared against a
//! signature database. Independently, heuristic analysis flags executables
//! with suspicious names and PE images importing blacklisted functions.

pub mod core;
pub mod detection;
pub mod scanner;
pub mod ui;
pub mod utils;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::error::{Error, Result};
pub use crate::core::types::*;
pub use crate::detection::{BlacklistFunctionSet, SignatureDatabase};
pub use crate::scanner::{FindingSink, Scanner};
