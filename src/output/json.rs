//! JSON report for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//! Records are buffered during the scan and written as one document when
//! the scan finishes.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "sequence": 1,
//!       "hash": "abc123...",
//!       "size": 7340032,
//!       "size_mb": 7,
//!       "original": { "path": "/data/b.tar", "modified": "2007-07-10T01:43:12+00:00" },
//!       "duplicate": { "path": "/data/c.tar", "modified": "2007-07-10T01:43:27+00:00" }
//!     }
//!   ],
//!   "summary": {
//!     "search_path": "/data",
//!     "files_examined": 100,
//!     "files_hashed": 12,
//!     "duplicates_found": 1,
//!     "wasted_bytes": 7340032,
//!     "wasted_mb": 7,
//!     "scan_duration_ms": 1234,
//!     "errors": 0
//!   }
//! }
//! ```

use std::io::Write;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ReportError, ReportSink};
use crate::duplicates::{DuplicateRecord, ScanSummary};

/// One side of a duplicate pair.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Path as recorded during the scan
    pub path: String,
    /// Last modified time (RFC 3339, UTC)
    pub modified: String,
}

impl JsonFile {
    fn new(path: &std::path::Path, modified: SystemTime) -> Self {
        let datetime: DateTime<Utc> = modified.into();
        Self {
            path: path.to_string_lossy().into_owned(),
            modified: datetime.to_rfc3339(),
        }
    }
}

/// A single duplicate pair in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicate {
    /// 1-based discovery order
    pub sequence: usize,
    /// BLAKE3 hash as hexadecimal string (64 characters)
    pub hash: String,
    /// File size in bytes
    pub size: u64,
    /// File size in whole megabytes
    pub size_mb: u64,
    /// The cached file
    pub original: JsonFile,
    /// The file found to duplicate it
    pub duplicate: JsonFile,
}

impl From<&DuplicateRecord> for JsonDuplicate {
    fn from(record: &DuplicateRecord) -> Self {
        Self {
            sequence: record.sequence_number,
            hash: record.hash_hex(),
            size: record.byte_size,
            size_mb: record.size_mb(),
            original: JsonFile::new(&record.original_path, record.original_modified),
            duplicate: JsonFile::new(&record.duplicate_path, record.duplicate_modified),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Root that was searched
    pub search_path: String,
    /// Files at or above the size threshold
    pub files_examined: usize,
    /// Files below the size threshold
    pub files_skipped: usize,
    /// Files whose content was hashed
    pub files_hashed: usize,
    /// Number of duplicate pairs
    pub duplicates_found: usize,
    /// Combined size of duplicates in bytes
    pub wasted_bytes: u64,
    /// Combined size of duplicates in whole megabytes
    pub wasted_mb: u64,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// Number of per-file errors
    pub errors: usize,
}

impl From<&ScanSummary> for JsonSummary {
    fn from(summary: &ScanSummary) -> Self {
        Self {
            search_path: summary.search_path.to_string_lossy().into_owned(),
            files_examined: summary.files_examined,
            files_skipped: summary.files_skipped,
            files_hashed: summary.files_hashed,
            duplicates_found: summary.duplicate_count,
            wasted_bytes: summary.wasted_bytes,
            wasted_mb: summary.wasted_mb(),
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            errors: summary.scan_errors.len(),
        }
    }
}

/// Complete JSON document.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Duplicate pairs in discovery order
    pub duplicates: Vec<JsonDuplicate>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

/// Buffering JSON report.
pub struct JsonReport<W: Write> {
    writer: W,
    duplicates: Vec<JsonDuplicate>,
    pretty: bool,
}

impl<W: Write> JsonReport<W> {
    /// Create a pretty-printing JSON report writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            duplicates: Vec::new(),
            pretty: true,
        }
    }

    /// Toggle pretty-printing.
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Consume the report, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for JsonReport<W> {
    fn write_record(&mut self, record: &DuplicateRecord) -> Result<(), ReportError> {
        self.duplicates.push(JsonDuplicate::from(record));
        Ok(())
    }

    fn finish(&mut self, summary: &ScanSummary) -> Result<(), ReportError> {
        let output = JsonOutput {
            duplicates: std::mem::take(&mut self.duplicates),
            summary: JsonSummary::from(summary),
        };

        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, &output)?;
        } else {
            serde_json::to_writer(&mut self.writer, &output)?;
        }
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
