//! Duplicate groups as reported by the scanner, and their resolved ordering.
//!
//! # Example
//!
//! ```
//! use dupe_sidecar::duplicates::{DuplicateGroup, PriorityOrder};
//! use std::path::PathBuf;
//!
//! let group = DuplicateGroup::new(vec![
//!     PathBuf::from("/data/b/file.txt"),
//!     PathBuf::from("/data/a/file.txt"),
//! ]);
//! let order = PriorityOrder::new(&[PathBuf::from("/data/a")]);
//! let ordered = order.order(&group);
//!
//! assert_eq!(ordered.keep(), Some(PathBuf::from("/data/a/file.txt").as_path()));
//! assert_eq!(ordered.victims(), &[PathBuf::from("/data/b/file.txt")]);
//! ```

use std::path::{Path, PathBuf};

/// A set of files the scanner asserts are byte-identical.
///
/// Paths are kept in report order; that order is the tie-breaker used by
/// [`PriorityOrder`](super::PriorityOrder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Paths in the order the scanner listed them
    pub paths: Vec<PathBuf>,
    /// File size in bytes, when the scanner reported it
    pub size: Option<u64>,
}

impl DuplicateGroup {
    /// Create a group without size information.
    #[must_use]
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths, size: None }
    }

    /// Create a group with the size the scanner reported.
    #[must_use]
    pub fn with_size(paths: Vec<PathBuf>, size: u64) -> Self {
        Self {
            paths,
            size: Some(size),
        }
    }

    /// Number of paths as reported (before deduplication).
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group has no paths at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// A duplicate group in resolution order.
///
/// Index 0 is the file to keep; everything after it is a deletion candidate.
/// Paths are distinct and normalized.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderedGroup {
    paths: Vec<PathBuf>,
}

impl OrderedGroup {
    pub(crate) fn from_ordered(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// The survivor, if the group is non-empty.
    #[must_use]
    pub fn keep(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    /// Files to delete in favour of [`keep`](Self::keep).
    #[must_use]
    pub fn victims(&self) -> &[PathBuf] {
        self.paths.get(1..).unwrap_or(&[])
    }

    /// All paths, survivor first.
    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Number of distinct paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// A group needs action only when there is something to delete.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        self.paths.len() >= 2
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.paths
    }
}
