//! Command-line interface definitions for lazydupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, config file) and
//! subcommands for different operations.
//!
//! # Example
//!
//! ```bash
//! # Report duplicates of 1 MB or more (the default threshold)
//! lazydupe scan ~/Downloads
//!
//! # Lower the threshold and write a CSV report
//! lazydupe scan ~/Downloads --size 10KB --report dupes.csv --format csv
//!
//! # Print the checksum of individual files
//! lazydupe hash a.iso b.iso
//!
//! # Verbose mode for debugging
//! lazydupe -v scan ~/Downloads
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use thiserror::Error;

use crate::output::ReportFormat;

/// Find duplicate files by size, then by content.
///
/// Only files whose byte-size has been seen before are hashed, so large trees
/// of mostly unique files are scanned quickly.
#[derive(Debug, Parser)]
#[command(name = "lazydupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print errors as structured JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Write log output to a file instead of stderr
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for lazydupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for duplicate files
    Scan(ScanArgs),
    /// Print the content checksum of files
    Hash(HashArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory path to scan for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Minimum file size to consider (e.g., 10bytes, 10KB, 10MB, 10GB, 10TB)
    ///
    /// A plain number is read as megabytes (1 = 1MB). Default: 1MB.
    #[arg(short, long, value_name = "SIZE", value_parser = parse_size)]
    pub size: Option<u64>,

    /// Report file path
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Also hash the first file of each size once a second one is found
    ///
    /// Without this, a pair of exactly two identical files is not reported.
    #[arg(long)]
    pub retro_hash: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,
}

/// Arguments for the hash subcommand.
#[derive(Debug, Args)]
pub struct HashArgs {
    /// Files to hash
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

/// Errors produced when parsing a size string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizeParseError {
    /// The input was empty.
    #[error("Size cannot be empty")]
    Empty,

    /// The numeric part is not a non-negative integer.
    #[error("Invalid number: '{0}'")]
    InvalidNumber(String),

    /// The input was negative.
    #[error("Size cannot be negative")]
    Negative,

    /// The suffix is not a known unit.
    #[error("Unknown size suffix: '{0}' (use bytes, KB, MB, GB or TB)")]
    UnknownSuffix(String),

    /// The value does not fit in 64 bits.
    #[error("Size is too large: '{0}'")]
    Overflow(String),
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: bytes (or B), KB, MB, GB, TB, all powers of 1024.
/// Case-insensitive. Numbers without suffix are treated as megabytes.
///
/// # Examples
///
/// ```
/// use lazydupe::cli::parse_size;
///
/// assert_eq!(parse_size("1").unwrap(), 1_048_576);
/// assert_eq!(parse_size("10bytes").unwrap(), 10);
/// assert_eq!(parse_size("1KB").unwrap(), 1_024);
/// assert_eq!(parse_size("1MB").unwrap(), 1_048_576);
/// ```
///
/// # Errors
///
/// Returns an error if the string is empty, contains an invalid or
/// negative number, overflows, or carries an unknown size suffix.
pub fn parse_size(s: &str) -> Result<u64, SizeParseError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(SizeParseError::Empty);
    }
    if s.starts_with('-') {
        return Err(SizeParseError::Negative);
    }

    // Find where the number ends and the suffix begins
    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    if num_str.is_empty() {
        return Err(SizeParseError::InvalidNumber(s.to_string()));
    }
    let num: u64 = num_str
        .parse()
        .map_err(|_| SizeParseError::Overflow(s.to_string()))?;

    let multiplier: u64 = match suffix.as_str() {
        "BYTES" | "BYTE" | "B" => 1,
        "KB" => 1_024,
        "" | "MB" => 1_048_576,
        "GB" => 1_073_741_824,
        "TB" => 1_099_511_627_776,
        _ if suffix.starts_with('.') => return Err(SizeParseError::InvalidNumber(s.to_string())),
        _ => return Err(SizeParseError::UnknownSuffix(suffix)),
    };

    num.checked_mul(multiplier)
        .ok_or_else(|| SizeParseError::Overflow(s.to_string()))
}
