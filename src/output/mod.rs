//! Report sinks for duplicate scan results.
//!
//! This module provides different report formats:
//! - Legacy text, one header line and two rows per duplicate pair
//! - CSV for spreadsheet import
//! - JSON for automation and scripting
//!
//! Text and CSV reports stream each record as it is found; the JSON report
//! buffers records and writes a single document when the scan finishes.
//!
//! # Example
//!
//! ```no_run
//! use lazydupe::duplicates::DuplicateFinder;
//! use lazydupe::output::{open_report, ReportFormat};
//! use std::path::Path;
//!
//! let mut report = open_report(Path::new("report.txt"), ReportFormat::Text).unwrap();
//! let finder = DuplicateFinder::with_defaults();
//! let (registry, _summary) = finder
//!     .find_duplicates_with_report(Path::new("."), report.as_mut())
//!     .unwrap();
//! println!("{} duplicates", registry.len());
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::duplicates::{DuplicateRecord, ScanSummary};

pub use self::csv::CsvReport;
pub use self::json::JsonReport;
pub use self::text::TextReport;

/// Timestamp layout used by the text and CSV reports.
pub const MOD_DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The report file could not be created.
    #[error("Cannot create report {path}: {source}")]
    Create {
        /// Report path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// Error during JSON serialization.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Destination for duplicate records produced during a scan.
pub trait ReportSink {
    /// Append one duplicate record, in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if the record cannot be written.
    fn write_record(&mut self, record: &DuplicateRecord) -> Result<(), ReportError>;

    /// Finalize the report once the scan has completed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if flushing or serialization fails.
    fn finish(&mut self, summary: &ScanSummary) -> Result<(), ReportError>;
}

/// Report output format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Legacy comma-separated text report
    #[default]
    Text,
    /// CSV with a header row
    Csv,
    /// Single JSON document
    Json,
}

impl ReportFormat {
    /// Default report file name for this format.
    #[must_use]
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Text => "DuplicateReport.txt",
            Self::Csv => "DuplicateReport.csv",
            Self::Json => "DuplicateReport.json",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Csv => write!(f, "csv"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Create the report file at `path` and wrap it in the sink for `format`.
///
/// An existing file is truncated.
///
/// # Errors
///
/// Returns [`ReportError::Create`] if the file cannot be created.
pub fn open_report(path: &Path, format: ReportFormat) -> Result<Box<dyn ReportSink>, ReportError> {
    let file = File::create(path).map_err(|source| ReportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let writer = BufWriter::new(file);
    log::debug!("Writing {} report to {}", format, path.display());

    Ok(match format {
        ReportFormat::Text => Box::new(TextReport::new(writer)),
        ReportFormat::Csv => Box::new(CsvReport::new(writer)),
        ReportFormat::Json => Box::new(JsonReport::new(writer)),
    })
}

/// Format a modification time in local time, `MM/DD/YYYY hh:mm:ss AM`.
#[must_use]
pub fn format_mod_date(time: SystemTime) -> String {
    let datetime: DateTime<Local> = time.into();
    datetime.format(MOD_DATE_FORMAT).to_string()
}
