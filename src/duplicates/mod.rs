//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size-bucket pre-filtering (first file of a size is never hashed)
//! - The global checksum cache keyed by content hash
//! - The append-only registry of confirmed duplicate pairs
//! - The finder that drives all three over a directory walk

pub mod buckets;
pub mod cache;
pub mod finder;
pub mod registry;

pub use buckets::SizeBucketTracker;
pub use cache::ChecksumCache;
pub use finder::{
    DuplicateFinder, FileState, FinderConfig, FinderError, ScanSession, ScanSummary,
    DEFAULT_MIN_SIZE,
};
pub use registry::{DuplicateRecord, DuplicateRegistry, BYTES_PER_MB};
