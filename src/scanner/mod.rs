//! Scanning of files and folders.
//!
//! This module provides:
//! - Folder traversal
//! - The file scanner (sequential and parallel)
//! - Sinks receiving progress and findings

pub mod file;
pub mod sink;
pub mod walker;

pub use file::{Findings, Scanner};
pub use sink::{CollectingSink, ConsoleSink, FindingSink};
pub use walker::enumerate_files;
