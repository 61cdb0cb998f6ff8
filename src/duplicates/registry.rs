//! Registry of confirmed duplicate pairs.
//!
//! Every time a hashed file matches a cached record, the finder appends a
//! [`DuplicateRecord`] pairing the cached file (the original) with the newly
//! examined one (the duplicate). The registry keeps discovery order and the
//! running total of bytes held by duplicates.

use std::path::PathBuf;
use std::time::SystemTime;

use crate::scanner::{hash_to_hex, FileRecord, Hash};

/// Bytes per megabyte used in report sizes.
pub const BYTES_PER_MB: u64 = 1_048_576;

/// A confirmed duplicate pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateRecord {
    /// 1-based position of this record in discovery order
    pub sequence_number: usize,
    /// Path of the cached (original) file
    pub original_path: PathBuf,
    /// Modification time of the original file
    pub original_modified: SystemTime,
    /// Path of the file that duplicates the original
    pub duplicate_path: PathBuf,
    /// Modification time of the duplicate file
    pub duplicate_modified: SystemTime,
    /// Extension of the duplicate file (`".txt"`), empty if none
    pub extension: String,
    /// Size in bytes shared by both files
    pub byte_size: u64,
    /// Full-content hash shared by both files
    pub content_hash: Hash,
}

impl DuplicateRecord {
    /// Size in whole megabytes, truncated.
    #[must_use]
    pub fn size_mb(&self) -> u64 {
        self.byte_size / BYTES_PER_MB
    }

    /// Content hash as hexadecimal string.
    #[must_use]
    pub fn hash_hex(&self) -> String {
        hash_to_hex(&self.content_hash)
    }
}

/// Ordered, append-only collection of duplicate records.
#[derive(Debug, Default, Clone)]
pub struct DuplicateRegistry {
    records: Vec<DuplicateRecord>,
    wasted_bytes: u64,
}

impl DuplicateRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair and return the stored record.
    ///
    /// `duplicate` must carry the content hash it matched on; the wasted-byte
    /// total grows by the duplicate's size.
    pub fn record(
        &mut self,
        original: &FileRecord,
        duplicate: &FileRecord,
        hash: Hash,
    ) -> &DuplicateRecord {
        debug_assert_eq!(original.byte_size, duplicate.byte_size);

        self.wasted_bytes = self.wasted_bytes.saturating_add(duplicate.byte_size);
        self.records.push(DuplicateRecord {
            sequence_number: self.records.len() + 1,
            original_path: original.path.clone(),
            original_modified: original.modified,
            duplicate_path: duplicate.path.clone(),
            duplicate_modified: duplicate.modified,
            extension: duplicate.extension.clone(),
            byte_size: duplicate.byte_size,
            content_hash: hash,
        });
        &self.records[self.records.len() - 1]
    }

    /// Records in discovery order.
    #[must_use]
    pub fn records(&self) -> &[DuplicateRecord] {
        &self.records
    }

    /// Combined size of every duplicate (originals excluded).
    #[must_use]
    pub fn wasted_bytes(&self) -> u64 {
        self.wasted_bytes
    }

    /// Wasted bytes in whole megabytes, truncated.
    #[must_use]
    pub fn wasted_mb(&self) -> u64 {
        self.wasted_bytes / BYTES_PER_MB
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no duplicates were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate records in discovery order.
    pub fn iter(&self) -> std::slice::Iter<'_, DuplicateRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a DuplicateRegistry {
    type Item = &'a DuplicateRecord;
    type IntoIter = std::slice::Iter<'a, DuplicateRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
