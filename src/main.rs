//! simple-antivirus command-line entry point.

use simple_antivirus::core::config::Config;
use simple_antivirus::core::error::Result;
use simple_antivirus::core::types::ScanSummary;
use simple_antivirus::detection::{BlacklistFunctionSet, SignatureDatabase};
use simple_antivirus::scanner::{enumerate_files, CollectingSink, ConsoleSink, FindingSink, Scanner};
use simple_antivirus::ui::cli::{Cli, Commands, ConfigAction, OutputFormat};
use simple_antivirus::ui::prompt::read_folder_path;
use simple_antivirus::utils::hash::HashCalculator;
use simple_antivirus::utils::logging::{init_logging, LogConfig};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = e.suggestion() {
                eprintln!("Hint: {}", hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Load configuration before logging so the configured level applies
    let (config, config_error) = match &cli.config {
        Some(path) => (Config::load(path)?, None),
        None => Config::load_or_default(&Config::default_config_path()),
    };

    let log_config = if cli.verbose {
        LogConfig::verbose()
    } else if cli.quiet {
        LogConfig::quiet()
    } else {
        LogConfig::from_config(&config)
    };
    init_logging(log_config)?;

    log::info!("simple-antivirus v{}", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        log::warn!("Failed to load config, using defaults: {}", e);
    }
    config.validate()?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(Config::default_config_path);

    match cli.command {
        Some(Commands::Scan {
            path,
            signatures,
            blacklist,
            no_heuristic,
            threads,
        }) => {
            let options = ScanOptions {
                path,
                signatures,
                blacklist,
                no_heuristic,
                threads,
            };
            run_scan(&config, options, cli.format).await
        }
        Some(Commands::Hash { files }) => run_hash(&files, cli.format),
        Some(Commands::Config { action }) => run_config(action, &config, &config_path),
        Some(Commands::Info) => run_info(&config, &config_path),
        None => {
            println!("simple-antivirus - hash signature and heuristic scanner");
            println!();
            println!("Use --help for usage information");
            println!();
            println!("Quick start:");
            println!("  simple-av scan <FOLDER>     Scan a folder");
            println!("  simple-av hash <FILE>       Print a file's SHA-256 digest");
            Ok(())
        }
    }
}

/// Scan command arguments.
struct ScanOptions {
    path: Option<PathBuf>,
    signatures: Option<PathBuf>,
    blacklist: Option<PathBuf>,
    no_heuristic: bool,
    threads: Option<usize>,
}

/// Scan a folder.
async fn run_scan(config: &Config, options: ScanOptions, format: OutputFormat) -> Result<()> {
    let root = match options.path {
        Some(path) => path,
        // Keep stdout clean for the JSON document
        None => match format {
            OutputFormat::Json => read_folder_path(io::stdin().lock(), io::stderr())?,
            OutputFormat::Text => read_folder_path(io::stdin().lock(), io::stdout())?,
        },
    };

    let signature_path = options
        .signatures
        .unwrap_or_else(|| config.detection.signature_path.clone());
    let blacklist_path = options
        .blacklist
        .unwrap_or_else(|| config.detection.blacklist_path.clone());

    let db = SignatureDatabase::load(&signature_path)?;
    let blacklist = BlacklistFunctionSet::load(&blacklist_path)?;
    let files = enumerate_files(&root, &config.scan)?;

    let scanner = Scanner::from_config(Arc::new(db), Arc::new(blacklist), &config.detection)
        .with_heuristics(config.detection.heuristic_enabled && !options.no_heuristic);
    let workers = options.threads.unwrap_or(config.scan.scan_threads);

    log::info!("Starting scan of {}", root.display());

    match format {
        OutputFormat::Json => {
            let mut sink = CollectingSink::new();
            let summary = execute_scan(&scanner, files, workers, &mut sink).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Text => {
            let mut sink = ConsoleSink::stdout();
            let summary = execute_scan(&scanner, files, workers, &mut sink).await?;
            print_summary(&summary);
        }
    }

    Ok(())
}

async fn execute_scan<I, S>(
    scanner: &Scanner,
    files: I,
    workers: usize,
    sink: &mut S,
) -> Result<ScanSummary>
where
    I: IntoIterator<Item = PathBuf>,
    S: FindingSink,
{
    if workers <= 1 {
        Ok(scanner.scan_with_sink(files, sink))
    } else {
        scanner.scan_parallel(files, workers, sink).await
    }
}

fn print_summary(summary: &ScanSummary) {
    println!();
    println!("=== Scan Complete ===");
    println!("Status:            {}", summary.status);
    println!("Files Scanned:     {}", summary.files_scanned);
    println!("Signature Matches: {}", summary.signature_matches());
    println!("Heuristic Flags:   {}", summary.heuristic_flags());
    println!("Errors:            {}", summary.errors);
    if let Some(duration) = summary.duration_secs() {
        println!("Duration:          {} seconds", duration);
    }
}

/// Print file digests in signature database form.
fn run_hash(files: &[PathBuf], format: OutputFormat) -> Result<()> {
    let mut failed = 0usize;
    let mut digests = Vec::with_capacity(files.len());

    for file in files {
        match HashCalculator::sha256_file(file) {
            Ok(digest) => match format {
                OutputFormat::Text => println!("{}  {}", digest, file.display()),
                OutputFormat::Json => digests.push(serde_json::json!({
                    "path": file,
                    "sha256": digest,
                })),
            },
            Err(e) => {
                log::error!("{}", e);
                failed += 1;
            }
        }
    }

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&digests)?);
    }

    if failed > 0 {
        return Err(anyhow::anyhow!("{} of {} file(s) could not be hashed", failed, files.len()).into());
    }
    Ok(())
}

/// Handle configuration commands.
fn run_config(action: ConfigAction, config: &Config, config_path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        ConfigAction::Reset => {
            log::info!("Resetting configuration to defaults...");
            Config::default().save(config_path)?;
            println!("Configuration reset to defaults.");
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}

/// Show application information.
fn run_info(config: &Config, config_path: &Path) -> Result<()> {
    println!("simple-antivirus - hash signature and heuristic scanner");
    println!();
    println!("Version:          {}", env!("CARGO_PKG_VERSION"));
    println!("Config Path:      {}", config_path.display());
    println!("Data Directory:   {}", Config::data_dir().display());
    println!();
    println!("Detection Settings:");
    println!("  Signatures:     {}", config.detection.signature_path.display());
    println!("  Blacklist:      {}", config.detection.blacklist_path.display());
    println!("  Heuristic:      {}", config.detection.heuristic_enabled);
    println!("  Name Tokens:    {}", config.detection.suspicious_name_tokens.join(", "));
    println!("  Extension:      {}", config.detection.executable_extension);
    println!();
    println!("Scan Settings:");
    match config.scan.max_file_size_bytes() {
        Some(_) => println!("  Max File Size:  {} MB", config.scan.max_file_size_mb),
        None => println!("  Max File Size:  unlimited"),
    }
    println!("  Follow Links:   {}", config.scan.follow_symlinks);
    println!("  Threads:        {}", config.scan.scan_threads);
    Ok(())
}
