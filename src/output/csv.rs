//! CSV report for duplicate scan results.
//!
//! Provides machine-readable CSV output for spreadsheets and data analysis.
//! Two rows are generated for each duplicate pair, the original first.
//!
//! # Columns
//!
//! - `pair`: 1-based sequence number of the duplicate pair
//! - `version`: `Original` or `Duplicate`
//! - `path`: Path to the file
//! - `size_mb`: File size in whole megabytes
//! - `size`: File size in bytes
//! - `modified`: Last modified time, local `MM/DD/YYYY hh:mm:ss AM`
//!
//! # Example
//!
//! ```no_run
//! use lazydupe::duplicates::DuplicateFinder;
//! use lazydupe::output::csv::CsvReport;
//! use std::path::Path;
//!
//! let mut report = CsvReport::new(std::io::stdout());
//! let finder = DuplicateFinder::with_defaults();
//! finder.find_duplicates_with_report(Path::new("."), &mut report).unwrap();
//! ```

use std::io;

use serde::Serialize;

use super::{format_mod_date, ReportError, ReportSink};
use crate::duplicates::{DuplicateRecord, ScanSummary};

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow {
    pair: usize,
    version: &'static str,
    path: String,
    size_mb: u64,
    size: u64,
    modified: String,
}

/// Streaming CSV report.
pub struct CsvReport<W: io::Write> {
    writer: csv::Writer<W>,
}

impl<W: io::Write> CsvReport<W> {
    /// Create a CSV report writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    /// Consume the report, returning the writer.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` if buffered rows cannot be flushed.
    pub fn into_inner(self) -> Result<W, ReportError> {
        self.writer
            .into_inner()
            .map_err(|e| ReportError::Io(e.into_error()))
    }
}

impl<W: io::Write> ReportSink for CsvReport<W> {
    fn write_record(&mut self, record: &DuplicateRecord) -> Result<(), ReportError> {
        let rows = [
            ("Original", &record.original_path, record.original_modified),
            ("Duplicate", &record.duplicate_path, record.duplicate_modified),
        ];

        for (version, path, modified) in rows {
            self.writer.serialize(CsvRow {
                pair: record.sequence_number,
                version,
                path: path.to_string_lossy().to_string(),
                size_mb: record.size_mb(),
                size: record.byte_size,
                modified: format_mod_date(modified),
            })?;
        }
        Ok(())
    }

    fn finish(&mut self, _summary: &ScanSummary) -> Result<(), ReportError> {
        self.writer.flush()?;
        Ok(())
    }
}
