//! Legacy text report.
//!
//! Each duplicate pair produces three lines:
//!
//! ```text
//! Duplicate Version,     Path,       Size,       ModDate
//! Original, /data/bzr-0-2.17.tar, 7 MB, 07/10/2007 01:43:12 AM
//! Duplicate, /data/bzr-0-3.17.tar, 7 MB, 07/10/2007 01:43:27 AM
//! ```
//!
//! Fields are joined with `", "` and are not quoted, so paths containing a
//! comma make the line ambiguous. Use the CSV report when that matters.

use std::io::Write;

use super::{format_mod_date, ReportError, ReportSink};
use crate::duplicates::{DuplicateRecord, ScanSummary};

/// Header line written before every pair.
pub const TEXT_HEADER: &str = "Duplicate Version,     Path,       Size,       ModDate";

/// Streaming legacy text report.
pub struct TextReport<W: Write> {
    writer: W,
}

impl<W: Write> TextReport<W> {
    /// Create a text report writing to `writer`.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the report, returning the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ReportSink for TextReport<W> {
    fn write_record(&mut self, record: &DuplicateRecord) -> Result<(), ReportError> {
        let size_mb = record.size_mb();
        writeln!(self.writer, "{}", TEXT_HEADER)?;
        writeln!(
            self.writer,
            "Original, {}, {} MB, {}",
            record.original_path.display(),
            size_mb,
            format_mod_date(record.original_modified)
        )?;
        writeln!(
            self.writer,
            "Duplicate, {}, {} MB, {}",
            record.duplicate_path.display(),
            size_mb,
            format_mod_date(record.duplicate_modified)
        )?;
        Ok(())
    }

    fn finish(&mut self, _summary: &ScanSummary) -> Result<(), ReportError> {
        self.writer.flush()?;
        Ok(())
    }
}
