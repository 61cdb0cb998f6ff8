//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Sequential, sorted directory walking using walkdir
//! - Whole-file content hashing with BLAKE3
//! - The [`FileRecord`] type describing an examined file
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and regular-file discovery
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use lazydupe::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.byte_size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub use hasher::{hash_to_hex, Hash, Hasher};
pub use walker::Walker;

/// Metadata for an examined file.
///
/// A record is built once when the walker yields the file and is not
/// mutated afterwards; the content hash is attached by value through
/// [`FileRecord::with_hash`] when the file is hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path to the file, as produced by the walker
    pub path: PathBuf,
    /// File size in bytes
    pub byte_size: u64,
    /// Full-content BLAKE3 hash, present once the file has been hashed
    pub content_hash: Option<Hash>,
    /// Last modification time
    pub modified: SystemTime,
    /// Creation time (falls back to the modification time where unsupported)
    pub created: SystemTime,
    /// Extension including the leading dot (`".txt"`), empty if none
    pub extension: String,
}

impl FileRecord {
    /// Create a new record without hash, using `modified` for both timestamps.
    #[must_use]
    pub fn new(path: PathBuf, byte_size: u64, modified: SystemTime) -> Self {
        let extension = extension_of(&path);
        Self {
            path,
            byte_size,
            content_hash: None,
            modified,
            created: modified,
            extension,
        }
    }

    /// Build a record from filesystem metadata.
    #[must_use]
    pub fn from_metadata(path: PathBuf, metadata: &Metadata) -> Self {
        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let created = metadata.created().unwrap_or(modified);
        let mut record = Self::new(path, metadata.len(), modified);
        record.created = created;
        record
    }

    /// Return this record with its content hash attached.
    #[must_use]
    pub fn with_hash(mut self, hash: Hash) -> Self {
        self.content_hash = Some(hash);
        self
    }
}

/// Extension of `path` with a leading dot, or an empty string.
fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,
    /// Canonical path of a file the walk must never yield, such as the
    /// report being written during the scan.
    pub exclude: Option<PathBuf>,
}

impl WalkerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(skip_hidden: bool) -> Self {
        Self {
            skip_hidden,
            exclude: None,
        }
    }

    /// Exclude a single file from the walk.
    ///
    /// The path should be canonical; entries are matched after
    /// canonicalization.
    #[must_use]
    pub fn with_exclude(mut self, path: PathBuf) -> Self {
        self.exclude = Some(path);
        self
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
