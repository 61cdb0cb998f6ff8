//! In-memory checksum cache keyed by full-content hash.
//!
//! The cache holds, for each content hash, the record of the first hashed
//! file that produced it. A later file with the same hash is a duplicate of
//! that cached record. Entries are never overwritten, so the cached record is
//! always the earliest-examined file for its hash.
//!
//! The hash space is global rather than partitioned by size. Callers must only
//! register hashes of complete file contents.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::scanner::{FileRecord, Hash};

/// Map from content hash to the first record that produced it.
#[derive(Debug, Default, Clone)]
pub struct ChecksumCache {
    entries: HashMap<Hash, FileRecord>,
}

impl ChecksumCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `hash`, registering `record` under it if absent.
    ///
    /// Returns the previously cached record when the hash is already known;
    /// the cached record is left untouched and `record` is dropped. Returns
    /// `None` after storing `record` as the representative for a new hash.
    ///
    /// # Example
    ///
    /// ```
    /// use lazydupe::duplicates::ChecksumCache;
    /// use lazydupe::scanner::FileRecord;
    /// use std::path::PathBuf;
    /// use std::time::SystemTime;
    ///
    /// let mut cache = ChecksumCache::new();
    /// let first = FileRecord::new(PathBuf::from("b.txt"), 100, SystemTime::now());
    /// let second = FileRecord::new(PathBuf::from("c.txt"), 100, SystemTime::now());
    ///
    /// assert!(cache.lookup_or_register([1; 32], first).is_none());
    /// let original = cache.lookup_or_register([1; 32], second).unwrap();
    /// assert_eq!(original.path, PathBuf::from("b.txt"));
    /// ```
    pub fn lookup_or_register(&mut self, hash: Hash, record: FileRecord) -> Option<&FileRecord> {
        match self.entries.entry(hash) {
            Entry::Occupied(occupied) => Some(occupied.into_mut()),
            Entry::Vacant(vacant) => {
                vacant.insert(record);
                None
            }
        }
    }

    /// Cached record for `hash`, if any.
    #[must_use]
    pub fn get(&self, hash: &Hash) -> Option<&FileRecord> {
        self.entries.get(hash)
    }

    /// Number of distinct hashes cached.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
