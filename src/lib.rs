//! lazydupe - duplicate file reporter
//!
//! Finds files with identical content beneath a directory tree. File sizes
//! act as a cheap pre-filter: a file is only hashed (BLAKE3, full content)
//! once another file of exactly the same size has been seen. Confirmed
//! duplicate pairs are written to a report as they are found.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use bytesize::ByteSize;

use crate::cli::{Cli, Commands, HashArgs, ScanArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig, ScanSummary};
use crate::error::ExitCode;
use crate::output::open_report;
use crate::progress::Progress;
use crate::scanner::{hash_to_hex, Hasher, WalkerConfig};

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error for fatal conditions: invalid configuration, an
/// unusable root, a report that cannot be created, or an interrupted scan.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let Cli {
        verbose,
        quiet,
        config,
        log_file,
        command,
        ..
    } = cli;

    logging::init_logging(verbose, quiet, log_file.as_deref())
        .context("Failed to open log file")?;

    match command {
        Commands::Scan(args) => run_scan(&args, config.as_deref(), quiet),
        Commands::Hash(args) => Ok(run_hash(&args)),
    }
}

fn run_scan(args: &ScanArgs, config_path: Option<&Path>, quiet: bool) -> anyhow::Result<ExitCode> {
    let mut config = Config::load(config_path).context("Failed to load configuration")?;
    config.merge_scan_args(args);
    let min_size = config.min_size_bytes()?;
    log::debug!("Effective configuration: {:?}", config);

    let shutdown = signal::install_handler()?;
    let progress = Arc::new(Progress::new(quiet));

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_min_size(min_size)
            .with_retro_hash(config.retro_hash)
            .with_walker_config(WalkerConfig::new(config.skip_hidden))
            .with_shutdown_flag(shutdown.get_flag())
            .with_progress_callback(progress),
    );

    finder.check_root(&args.path)?;
    let report_path = config.resolved_report_path();
    let mut report = open_report(&report_path, config.report_format)?;
    let finder = match report_path.canonicalize() {
        Ok(canonical) => finder.excluding(canonical),
        Err(e) => {
            log::warn!(
                "Could not resolve report path {}: {}",
                report_path.display(),
                e
            );
            finder
        }
    };

    if !quiet {
        println!(
            "Searching {} for duplicates of {} or more",
            args.path.display(),
            ByteSize(min_size)
        );
    }

    let (_registry, summary) = finder.find_duplicates_with_report(&args.path, report.as_mut())?;

    if summary.report_degraded {
        log::error!(
            "Report {} is incomplete; see the log for the write error",
            report_path.display()
        );
    }
    if !quiet {
        print!("{}", format_summary(&summary, &report_path));
    }

    Ok(if summary.is_partial() {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    })
}

fn run_hash(args: &HashArgs) -> ExitCode {
    let hasher = Hasher::new();
    let mut failures = 0usize;

    for path in &args.files {
        match hasher.full_hash(path) {
            Ok(hash) => println!("{}  {}", hash_to_hex(&hash), path.display()),
            Err(e) => {
                eprintln!("IO error for {}", path.display());
                log::debug!("{}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    }
}

/// Render the end-of-scan summary block printed on stdout.
#[must_use]
pub fn format_summary(summary: &ScanSummary, report_path: &Path) -> String {
    let mut out = String::from("\nDUPLICATE REPORT:\n");
    let mut line = |label: &str, value: String| {
        out.push_str(&format!("{:<30}{}\n", label, value));
    };

    line("Search Path:", summary.search_path.display().to_string());
    line(
        "Wasted Space in Duplicates:",
        format!("{}  MB", summary.wasted_mb()),
    );
    line("Duplicates Found:", summary.duplicate_count.to_string());
    if !summary.scan_errors.is_empty() {
        line("Files Not Examined:", summary.scan_errors.len().to_string());
    }
    line("Report Generated at:", report_path.display().to_string());
    line(
        "Search Time:",
        format!("{}  minutes", summary.search_minutes()),
    );
    out
}
