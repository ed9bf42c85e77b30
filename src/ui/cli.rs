//! Command-line interface definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Simple antivirus: hash signatures and PE import heuristics
#[derive(Parser, Debug)]
#[command(name = "simple-av")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format (text, json)
    #[arg(long, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Use a specific configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine processing
    Json,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a folder recursively
    Scan {
        /// Folder to scan (prompted for when omitted)
        path: Option<PathBuf>,

        /// Signature database file (virusName,sha256 per line)
        #[arg(long, value_name = "FILE")]
        signatures: Option<PathBuf>,

        /// Blacklisted import names, one per line
        #[arg(long, value_name = "FILE")]
        blacklist: Option<PathBuf>,

        /// Disable heuristic analysis
        #[arg(long)]
        no_heuristic: bool,

        /// Number of scan threads
        #[arg(short, long)]
        threads: Option<usize>,
    },

    /// Print the SHA-256 digest of files
    Hash {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Configure settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show application information
    Info,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print configuration file location
    Path,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
