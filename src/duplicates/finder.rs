//! Duplicate finder implementation with lazy size-gated hashing.
//!
//! # Overview
//!
//! The finder walks a directory tree once and examines every regular file in
//! walk order:
//!
//! 1. **Threshold**: files smaller than the configured minimum are skipped
//!    and never touch any tracker.
//! 2. **Size bucket**: the first file of a given byte-size is only noted in
//!    the [`SizeBucketTracker`]; it is not hashed.
//! 3. **Checksum**: every later file of an already-seen size is hashed in
//!    full and looked up in the [`ChecksumCache`]. A hit is a confirmed
//!    duplicate and goes to the [`DuplicateRegistry`]; a miss makes the file
//!    the reference for its hash.
//!
//! Because the first file of a size is never hashed, a pair of exactly two
//! identical files is not reported; a third copy is needed, and it pairs with
//! the second. [`FinderConfig::with_retro_hash`] hashes the first file of a
//! size class when the second one arrives, which closes that gap.
//!
//! # Example
//!
//! ```no_run
//! use lazydupe::duplicates::{DuplicateFinder, FinderConfig};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_min_size(1024));
//! let (registry, summary) = finder.find_duplicates(Path::new("/srv/backups")).unwrap();
//!
//! for record in &registry {
//!     println!("{} -> {}", record.original_path.display(), record.duplicate_path.display());
//! }
//! println!("{} MB wasted", summary.wasted_mb());
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::{ChecksumCache, DuplicateRegistry, SizeBucketTracker, BYTES_PER_MB};
use crate::output::ReportSink;
use crate::progress::{ProgressCallback, PHASE_SCAN};
use crate::scanner::{FileRecord, Hash, HashError, Hasher, ScanError, Walker, WalkerConfig};

/// Default minimum file size (1 MB).
pub const DEFAULT_MIN_SIZE: u64 = BYTES_PER_MB;

/// Terminal state of one examined file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// Below the size threshold; not counted or bucketed
    Skipped,
    /// First file of its size; noted but not hashed
    SizeFirstSeen,
    /// Hashed and stored as the reference for a new hash
    RegisteredAsReference,
    /// Hashed and matched a cached reference
    RegisteredAsDuplicate,
    /// Hashing failed; the file is excluded from the results
    HashFailed,
}

/// Per-scan detection state.
///
/// Owns the size buckets, the checksum cache and the duplicate registry for
/// exactly one scan. Nothing is shared between sessions.
#[derive(Debug)]
pub struct ScanSession {
    min_size: u64,
    retro_hash: bool,
    buckets: SizeBucketTracker,
    checksums: ChecksumCache,
    registry: DuplicateRegistry,
    /// First file of each size class, kept only in retro-hash mode
    first_of_size: HashMap<u64, FileRecord>,
    files_hashed: usize,
    errors: Vec<ScanError>,
}

impl ScanSession {
    /// Create an empty session.
    #[must_use]
    pub fn new(min_size: u64, retro_hash: bool) -> Self {
        Self {
            min_size,
            retro_hash,
            buckets: SizeBucketTracker::new(),
            checksums: ChecksumCache::new(),
            registry: DuplicateRegistry::new(),
            first_of_size: HashMap::new(),
            files_hashed: 0,
            errors: Vec::new(),
        }
    }

    /// Examine one file, hashing it with `hash_file` when its size gates it in.
    ///
    /// Any duplicate found is appended to the registry; callers that stream
    /// results compare [`DuplicateRegistry::len`] before and after the call.
    pub fn examine<F>(&mut self, record: FileRecord, mut hash_file: F) -> FileState
    where
        F: FnMut(&FileRecord) -> Result<Hash, HashError>,
    {
        let size = record.byte_size;
        if size < self.min_size {
            log::trace!("Below threshold ({} bytes): {}", size, record.path.display());
            return FileState::Skipped;
        }

        if !self.buckets.observe(size) {
            log::debug!(
                "New size {} from {} ({} sizes in buckets)",
                size,
                record.path.display(),
                self.buckets.len()
            );
            if self.retro_hash {
                self.first_of_size.insert(size, record);
            }
            return FileState::SizeFirstSeen;
        }

        if let Some(first) = self.first_of_size.remove(&size) {
            log::debug!("Retroactively hashing {}", first.path.display());
            self.hash_and_settle(first, &mut hash_file);
        }

        self.hash_and_settle(record, &mut hash_file)
    }

    fn hash_and_settle<F>(&mut self, record: FileRecord, hash_file: &mut F) -> FileState
    where
        F: FnMut(&FileRecord) -> Result<Hash, HashError>,
    {
        log::debug!("Doing checksum on {}", record.path.display());
        match hash_file(&record) {
            Ok(hash) => {
                self.files_hashed += 1;
                self.settle(record.with_hash(hash), hash)
            }
            Err(e) => {
                log::warn!("Failed to hash {}: {}", record.path.display(), e);
                self.errors.push(ScanError::Hash(e));
                FileState::HashFailed
            }
        }
    }

    fn settle(&mut self, record: FileRecord, hash: Hash) -> FileState {
        match self.checksums.lookup_or_register(hash, record.clone()) {
            Some(original) => {
                self.registry.record(original, &record, hash);
                FileState::RegisteredAsDuplicate
            }
            None => {
                log::debug!(
                    "Registered reference {} ({} hashes cached)",
                    record.path.display(),
                    self.checksums.len()
                );
                FileState::RegisteredAsReference
            }
        }
    }

    /// Duplicates found so far.
    #[must_use]
    pub fn registry(&self) -> &DuplicateRegistry {
        &self.registry
    }

    /// Number of files hashed so far.
    #[must_use]
    pub fn files_hashed(&self) -> usize {
        self.files_hashed
    }

    /// Number of distinct sizes observed.
    #[must_use]
    pub fn distinct_sizes(&self) -> usize {
        self.buckets.len()
    }

    /// Number of distinct hashes cached.
    #[must_use]
    pub fn cached_hashes(&self) -> usize {
        self.checksums.len()
    }

    /// Take the per-file errors collected so far.
    pub fn take_errors(&mut self) -> Vec<ScanError> {
        std::mem::take(&mut self.errors)
    }

    /// Consume the session, returning its registry.
    #[must_use]
    pub fn into_registry(self) -> DuplicateRegistry {
        self.registry
    }
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Minimum file size in bytes; smaller files are skipped.
    pub min_size: u64,
    /// Hash the first file of a size class once a second one arrives.
    pub retro_hash: bool,
    /// Walker configuration.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("min_size", &self.min_size)
            .field("retro_hash", &self.retro_hash)
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            retro_hash: false,
            walker_config: WalkerConfig::default(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the minimum file size in bytes.
    #[must_use]
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Enable retroactive hashing of the first file of each size class.
    #[must_use]
    pub fn with_retro_hash(mut self, enabled: bool) -> Self {
        self.retro_hash = enabled;
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Check if shutdown has been requested.
    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Root that was searched
    pub search_path: PathBuf,
    /// Regular files yielded by the walk
    pub files_seen: usize,
    /// Files at or above the size threshold
    pub files_examined: usize,
    /// Files below the size threshold
    pub files_skipped: usize,
    /// Files whose full content was hashed
    pub files_hashed: usize,
    /// Distinct byte-sizes observed
    pub distinct_sizes: usize,
    /// Distinct content hashes cached
    pub cached_hashes: usize,
    /// Number of duplicate records
    pub duplicate_count: usize,
    /// Combined size of all duplicates in bytes
    pub wasted_bytes: u64,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Whether report writing failed part-way and was abandoned
    pub report_degraded: bool,
    /// Per-file errors encountered during the scan
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Wasted space in whole megabytes, truncated.
    #[must_use]
    pub fn wasted_mb(&self) -> u64 {
        self.wasted_bytes / BYTES_PER_MB
    }

    /// Elapsed wall-clock time in whole minutes, truncated.
    #[must_use]
    pub fn search_minutes(&self) -> u64 {
        self.scan_duration.as_secs() / 60
    }

    /// Format wasted space as human-readable string.
    #[must_use]
    pub fn wasted_display(&self) -> String {
        ByteSize(self.wasted_bytes).to_string()
    }

    /// Whether the scan completed with per-file errors or a degraded report.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.scan_errors.is_empty() || self.report_degraded
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The provided path cannot be read.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while opening the root.
    #[error("I/O error for {path}: {source}")]
    IoWithPath {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl FinderError {
    /// Convert a root-check failure into a finder error.
    fn from_root(root: &Path, error: ScanError) -> Self {
        match error {
            ScanError::NotFound(path) => Self::PathNotFound(path),
            ScanError::NotADirectory(path) => Self::NotADirectory(path),
            ScanError::PermissionDenied(path) => Self::PermissionDenied(path),
            ScanError::Io { path, source } => Self::IoWithPath { path, source },
            ScanError::Hash(e) => Self::IoWithPath {
                path: root.to_path_buf(),
                source: std::io::Error::other(e.to_string()),
            },
        }
    }
}

/// Duplicate finder driving one [`ScanSession`] per call.
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a finder with default configuration (1 MB threshold).
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Leave `path` out of every walk this finder performs.
    ///
    /// Used for the report being written during the scan, so the tool never
    /// counts its own output. `path` should already be canonical.
    #[must_use]
    pub fn excluding(mut self, path: PathBuf) -> Self {
        self.config.walker_config = self.config.walker_config.with_exclude(path);
        self
    }

    /// Verify that `root` can be scanned, without creating any scan state.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the root is missing, not a directory or
    /// unreadable.
    pub fn check_root(&self, root: &Path) -> Result<(), FinderError> {
        Walker::new(root, self.config.walker_config.clone())
            .check_root()
            .map_err(|e| FinderError::from_root(root, e))
    }

    /// Find duplicate files beneath `root`.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError`] if the root cannot be scanned or the scan is
    /// interrupted. Per-file failures are collected in
    /// [`ScanSummary::scan_errors`] instead.
    pub fn find_duplicates(
        &self,
        root: &Path,
    ) -> Result<(DuplicateRegistry, ScanSummary), FinderError> {
        self.scan(root, None)
    }

    /// Find duplicate files beneath `root`, streaming each record to `report`.
    ///
    /// A write failure on the report is logged and further writes are
    /// abandoned; detection carries on and [`ScanSummary::report_degraded`]
    /// is set.
    ///
    /// # Errors
    ///
    /// Same as [`DuplicateFinder::find_duplicates`].
    pub fn find_duplicates_with_report(
        &self,
        root: &Path,
        report: &mut dyn ReportSink,
    ) -> Result<(DuplicateRegistry, ScanSummary), FinderError> {
        self.scan(root, Some(report))
    }

    /// Find duplicates among pre-collected records, in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Interrupted`] if shutdown is requested.
    pub fn find_duplicates_from_files<I>(
        &self,
        files: I,
    ) -> Result<(DuplicateRegistry, ScanSummary), FinderError>
    where
        I: IntoIterator<Item = FileRecord>,
    {
        self.run(
            files.into_iter().map(Ok),
            PathBuf::new(),
            None,
            Instant::now(),
        )
    }

    fn scan(
        &self,
        root: &Path,
        report: Option<&mut dyn ReportSink>,
    ) -> Result<(DuplicateRegistry, ScanSummary), FinderError> {
        let start_time = Instant::now();
        self.check_root(root)?;

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        log::info!(
            "Scanning {} for duplicates of at least {}",
            root.display(),
            ByteSize(self.config.min_size)
        );

        self.run(walker.walk(), root.to_path_buf(), report, start_time)
    }

    fn run<I>(
        &self,
        entries: I,
        search_path: PathBuf,
        mut report: Option<&mut dyn ReportSink>,
        start_time: Instant,
    ) -> Result<(DuplicateRegistry, ScanSummary), FinderError>
    where
        I: Iterator<Item = Result<FileRecord, ScanError>>,
    {
        let mut session = ScanSession::new(self.config.min_size, self.config.retro_hash);
        let mut summary = ScanSummary {
            search_path,
            ..Default::default()
        };
        let callback = self.config.progress_callback.as_ref();

        if let Some(cb) = callback {
            cb.on_phase_start(PHASE_SCAN, 0);
            if !summary.search_path.as_os_str().is_empty() {
                cb.on_message(&format!("Walking {}", summary.search_path.display()));
            }
        }

        for entry in entries {
            if self.config.is_shutdown_requested() {
                break;
            }

            let record = match entry {
                Ok(record) => record,
                Err(e) => {
                    summary.scan_errors.push(e);
                    continue;
                }
            };

            summary.files_seen += 1;
            if let Some(cb) = callback {
                cb.on_progress(summary.files_seen, record.path.to_string_lossy().as_ref());
            }

            let before = session.registry().len();
            match session.examine(record, |file| self.hasher.full_hash(&file.path)) {
                FileState::Skipped => summary.files_skipped += 1,
                _ => summary.files_examined += 1,
            }

            for duplicate in &session.registry().records()[before..] {
                log::debug!(
                    "Duplicate #{}: {} matches {}",
                    duplicate.sequence_number,
                    duplicate.duplicate_path.display(),
                    duplicate.original_path.display()
                );
                if let Some(cb) = callback {
                    cb.on_duplicate(duplicate);
                }

                let failed = match report.as_mut() {
                    Some(sink) => sink.write_record(duplicate).err(),
                    None => None,
                };
                if let Some(e) = failed {
                    log::warn!("Report write failed, continuing without report: {}", e);
                    summary.report_degraded = true;
                    report = None;
                }
            }
        }

        if let Some(cb) = callback {
            cb.on_phase_end(PHASE_SCAN);
        }

        if self.config.is_shutdown_requested() {
            log::info!("Scan interrupted after {} files", summary.files_seen);
            return Err(FinderError::Interrupted);
        }

        summary.scan_errors.extend(session.take_errors());
        summary.files_hashed = session.files_hashed();
        summary.distinct_sizes = session.distinct_sizes();
        summary.cached_hashes = session.cached_hashes();

        let registry = session.into_registry();
        summary.duplicate_count = registry.len();
        summary.wasted_bytes = registry.wasted_bytes();
        summary.scan_duration = start_time.elapsed();

        if let Some(sink) = report {
            if let Err(e) = sink.finish(&summary) {
                log::warn!("Failed to finalize report: {}", e);
                summary.report_degraded = true;
            }
        }

        log::info!(
            "Scan complete: {} files examined, {} hashed, {} duplicates, {} wasted, {} errors",
            summary.files_examined,
            summary.files_hashed,
            summary.duplicate_count,
            summary.wasted_display(),
            summary.scan_errors.len()
        );

        Ok((registry, summary))
    }
}
