//! Directory-priority ordering of duplicate groups.
//!
//! Callers rank root directories by trust: files under the first directory
//! win over files under the second, and so on. Files under none of them come
//! last. Within a tier, report order is kept.
//!
//! A path is placed under the *first* priority directory that strictly
//! contains it, so nested priority directories (e.g. `/data` before
//! `/data/import`) never place a path twice.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::groups::{DuplicateGroup, OrderedGroup};
use crate::scanner::path_utils::{is_strictly_within, normalize_absolute, normalize_pathbuf};

/// A normalized, ranked list of priority directories.
#[derive(Debug, Clone, Default)]
pub struct PriorityOrder {
    /// Directories in NFC comparison form, highest priority first
    dirs: Vec<PathBuf>,
}

impl PriorityOrder {
    /// Normalize the caller's directories once for reuse across groups.
    #[must_use]
    pub fn new<P: AsRef<Path>>(dirs: &[P]) -> Self {
        let dirs = dirs
            .iter()
            .map(|d| normalize_pathbuf(&normalize_absolute(d.as_ref())))
            .collect();
        Self { dirs }
    }

    /// Priority directories in comparison form.
    #[must_use]
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Order a scanner group. See [`order_paths`](Self::order_paths).
    #[must_use]
    pub fn order(&self, group: &DuplicateGroup) -> OrderedGroup {
        self.order_paths(&group.paths)
    }

    /// Arrange `paths` so that index 0 is the file to keep.
    ///
    /// The result is a permutation of the distinct normalized input paths.
    #[must_use]
    pub fn order_paths<P: AsRef<Path>>(&self, paths: &[P]) -> OrderedGroup {
        let mut seen = HashSet::with_capacity(paths.len());
        let candidates: Vec<PathBuf> = paths
            .iter()
            .map(|p| normalize_absolute(p.as_ref()))
            .filter(|p| seen.insert(p.clone()))
            .collect();

        let mut placed = vec![false; candidates.len()];
        let mut ordered = Vec::with_capacity(candidates.len());

        for dir in &self.dirs {
            for (i, path) in candidates.iter().enumerate() {
                if !placed[i] && is_strictly_within(path, dir) {
                    placed[i] = true;
                    ordered.push(path.clone());
                }
            }
        }

        for (i, path) in candidates.iter().enumerate() {
            if !placed[i] {
                ordered.push(path.clone());
            }
        }

        OrderedGroup::from_ordered(ordered)
    }
}

/// One-shot convenience over [`PriorityOrder`].
///
/// # Example
///
/// ```
/// use dupe_sidecar::duplicates::order_paths;
/// use std::path::PathBuf;
///
/// let ordered = order_paths(
///     &[PathBuf::from("/import/x.jpg"), PathBuf::from("/library/x.jpg")],
///     &[PathBuf::from("/library"), PathBuf::from("/import")],
/// );
/// assert_eq!(ordered[0], PathBuf::from("/library/x.jpg"));
/// ```
#[must_use]
pub fn order_paths<P: AsRef<Path>, D: AsRef<Path>>(paths: &[P], priority_dirs: &[D]) -> Vec<PathBuf> {
    PriorityOrder::new(priority_dirs)
        .order_paths(paths)
        .into_paths()
}
