//! Size-bucket pre-filter.
//!
//! Files of different sizes cannot share content, so the first file of any
//! given byte-size is never hashed. [`SizeBucketTracker`] only remembers
//! which sizes have been observed; it keeps no path or hash for them.

use std::collections::HashSet;

/// Set of byte-sizes observed so far in one scan.
///
/// A size enters the set the first time a file of that exact size is
/// observed and is never removed.
///
/// # Example
///
/// ```
/// use lazydupe::duplicates::SizeBucketTracker;
///
/// let mut buckets = SizeBucketTracker::new();
/// assert!(!buckets.observe(100));
/// assert!(buckets.observe(100));
/// assert!(!buckets.observe(200));
/// ```
#[derive(Debug, Default, Clone)]
pub struct SizeBucketTracker {
    seen: HashSet<u64>,
}

impl SizeBucketTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `size` and report whether it had been seen before this call.
    pub fn observe(&mut self, size: u64) -> bool {
        !self.seen.insert(size)
    }

    /// Whether `size` has been observed, without recording it.
    #[must_use]
    pub fn contains(&self, size: u64) -> bool {
        self.seen.contains(&size)
    }

    /// Number of distinct sizes observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no size has been observed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
