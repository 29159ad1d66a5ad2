//! Scanner module: obtaining duplicate groups from an external finder.
//!
//! This crate never hashes file content itself. Duplicate detection is
//! delegated to `jdupes`, whose JSON report is parsed into
//! [`DuplicateGroup`]s. The module provides:
//! - [`DuplicateScanner`]: the seam between the run and the finder
//! - [`JdupesScanner`]: spawns the `jdupes` binary
//! - [`ReportFileScanner`]: reads a previously saved `jdupes --json` report
//! - [`path_utils`]: normalization shared with the orderer
//!
//! # Example
//!
//! ```no_run
//! use dupe_sidecar::scanner::{DuplicateScanner, JdupesScanner, ScannerConfig};
//! use std::path::PathBuf;
//!
//! let scanner = JdupesScanner::new(ScannerConfig::default());
//! let groups = scanner.scan(&[PathBuf::from("/photos")]).unwrap();
//! println!("{} duplicate sets", groups.len());
//! ```

pub mod jdupes;
pub mod path_utils;

use std::path::{Path, PathBuf};

use crate::actions::sidecar::SidecarExtension;
use crate::duplicates::{DuplicateGroup, MalformedReportError};

// Re-export main types
pub use jdupes::{JdupesScanner, ReportFileScanner, DEFAULT_JDUPES_PATH};

/// Source of duplicate groups for a set of root directories.
pub trait DuplicateScanner {
    /// Find duplicate groups under `dirs`, in the finder's report order.
    ///
    /// # Errors
    ///
    /// Any error is fatal for the run; nothing has been modified yet.
    fn scan(&self, dirs: &[PathBuf]) -> Result<Vec<DuplicateGroup>, ScanError>;
}

/// Configuration for invoking `jdupes`.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Executable name or path.
    pub program: PathBuf,

    /// Hash database passed as `--hash-db`.
    pub hash_db: Option<PathBuf>,

    /// Sidecar extension to exclude from the scan, if any.
    pub exclude_extension: Option<SidecarExtension>,

    /// Extra arguments placed before the directories.
    pub extra_args: Vec<String>,

    /// Let the finder's stderr (its progress output) reach the terminal.
    pub passthrough_stderr: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_JDUPES_PATH),
            hash_db: None,
            exclude_extension: Some(SidecarExtension::default()),
            extra_args: Vec::new(),
            passthrough_stderr: false,
        }
    }
}

/// Errors that can occur while obtaining duplicate groups.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The finder could not be started.
    #[error("failed to run {program}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The finder exited unsuccessfully.
    #[error("{program} exited with {status}")]
    ExitStatus { program: PathBuf, status: String },

    /// A saved report could not be read.
    #[error("failed to read report {path}: {source}")]
    ReadReport {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report was not a valid duplicate listing.
    #[error(transparent)]
    Malformed(#[from] MalformedReportError),
}

/// Check that every root exists and is a directory.
///
/// # Errors
///
/// Returns `NotFound` or `NotADirectory` for the first offending root.
pub fn validate_directories(dirs: &[PathBuf]) -> Result<(), ScanError> {
    for dir in dirs {
        validate_directory(dir)?;
    }
    Ok(())
}

fn validate_directory(dir: &Path) -> Result<(), ScanError> {
    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(ScanError::NotADirectory(dir.to_path_buf())),
        Err(_) => Err(ScanError::NotFound(dir.to_path_buf())),
    }
}
