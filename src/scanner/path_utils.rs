//! Path normalization utilities.
//!
//! Two different normal forms are used by the resolver:
//!
//! - The *identity* form ([`normalize_absolute`]): an absolute path with `.`
//!   and `..` components folded lexically. This is the path that is deleted,
//!   written to sidecars and reported. Symlinks are never resolved, so a path
//!   keeps its identity even after the file it names has been removed.
//! - The *comparison* form ([`normalize_pathbuf`]): the identity form in
//!   Unicode NFC, used only to decide whether a file lives under a priority
//!   directory.
//!
//! # Background
//!
//! macOS uses NFD (Decomposed) normalization for file paths, while Windows
//! and Linux typically use NFC (Composed) normalization. The same visual
//! directory name typed on the command line and reported by the scanner can
//! therefore have different byte representations:
//!
//! - NFC: `café` - 'é' is U+00E9 (single code point)
//! - NFD: `café` - 'e' U+0065 + combining acute accent U+0301
//!
//! # Example
//!
//! ```
//! use dupe_sidecar::scanner::path_utils::is_strictly_within;
//! use std::path::Path;
//!
//! let dir = Path::new("/photos/caf\u{00e9}");
//! let file = Path::new("/photos/cafe\u{0301}/img.jpg");
//! assert!(is_strictly_within(file, dir));
//! ```

use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Normalize a path string to NFC (Composed) form.
///
/// # Example
///
/// ```
/// use dupe_sidecar::scanner::path_utils::normalize_path_str;
///
/// let nfd = "cafe\u{0301}.txt";
/// assert_eq!(normalize_path_str(nfd), "caf\u{00e9}.txt");
/// ```
#[must_use]
pub fn normalize_path_str(s: &str) -> String {
    s.nfc().collect()
}

/// Normalize a [`Path`] to NFC form.
///
/// If the path contains invalid UTF-8, returns the original path unchanged.
#[must_use]
pub fn normalize_pathbuf(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(normalize_path_str(s)),
        None => path.to_path_buf(),
    }
}

/// Fold `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root, matching POSIX `normpath` semantics.
///
/// # Example
///
/// ```
/// use dupe_sidecar::scanner::path_utils::lexical_normalize;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     lexical_normalize(Path::new("/data/./a/../b//file.txt")),
///     PathBuf::from("/data/b/file.txt")
/// );
/// ```
#[must_use]
pub fn lexical_normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                let ends_in_normal = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if ends_in_normal {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            Component::Normal(name) => out.push(name),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Make a path absolute (relative to the current directory) and fold it lexically.
///
/// Falls back to lexical folding alone if the current directory is unavailable.
#[must_use]
pub fn normalize_absolute(path: &Path) -> PathBuf {
    match std::path::absolute(path) {
        Ok(abs) => lexical_normalize(&abs),
        Err(e) => {
            log::debug!(
                "Could not make {} absolute, using it as given: {}",
                path.display(),
                e
            );
            lexical_normalize(path)
        }
    }
}

/// True when `path` is nested somewhere below `dir`.
///
/// The directory itself never matches, and matching is component-wise so
/// `/data/ab` is not inside `/data/a`. Both sides are compared in NFC form.
#[must_use]
pub fn is_strictly_within(path: &Path, dir: &Path) -> bool {
    let path = normalize_pathbuf(path);
    let dir = normalize_pathbuf(dir);
    path != dir && path.starts_with(&dir)
}
