//! Removal of duplicate files.
//!
//! # Overview
//!
//! Victims are removed one at a time, either permanently (the default) or by
//! moving them to the system trash. Errors are classified so the resolver
//! can tell "already gone" apart from real failures:
//!
//! - [`DeleteError::NotFound`]: the file is already absent, which satisfies
//!   the deletion
//! - [`DeleteError::PermissionDenied`]: logged, the file is left alone
//! - anything else: logged, the file is left alone
//!
//! # Example
//!
//! ```no_run
//! use dupe_sidecar::actions::delete::{delete_file, DeleteMode};
//! use std::path::Path;
//!
//! match delete_file(Path::new("/path/to/duplicate.txt"), DeleteMode::Permanent) {
//!     Ok(()) => println!("deleted"),
//!     Err(e) => eprintln!("Failed: {}", e),
//! }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for deletion operations.
#[derive(Debug, Error)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// Trash operation failed.
    #[error("trash operation failed for {path}: {message}")]
    TrashFailed { path: PathBuf, message: String },

    /// The file chosen to keep is the sidecar of a file being deleted.
    #[error("refusing to resolve group: survivor {keep} is the sidecar of duplicate {owner}")]
    SurvivorIsSidecar { keep: PathBuf, owner: PathBuf },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DeleteError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::SurvivorIsSidecar { keep: p, .. }
            | Self::TrashFailed { path: p, .. }
            | Self::Io { path: p, .. } => p,
        }
    }

    /// True when the file is already absent.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    fn from_io(path: &Path, e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: e,
            },
        }
    }
}

/// How victims are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteMode {
    /// Unlink the file. Not recoverable.
    #[default]
    Permanent,
    /// Move the file to the system trash.
    Trash,
}

impl std::fmt::Display for DeleteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteMode::Permanent => write!(f, "permanent"),
            DeleteMode::Trash => write!(f, "trash"),
        }
    }
}

/// Delete a single file.
///
/// # Errors
///
/// - `NotFound` if the file doesn't exist
/// - `PermissionDenied` if deletion is not allowed
/// - `TrashFailed` if the trash operation fails
/// - `Io` for any other OS failure
pub fn delete_file(path: &Path, mode: DeleteMode) -> Result<(), DeleteError> {
    match mode {
        DeleteMode::Permanent => permanent_delete(path),
        DeleteMode::Trash => delete_to_trash(path),
    }
}

/// Permanently delete a single file.
///
/// # Errors
///
/// See [`delete_file`].
pub fn permanent_delete(path: &Path) -> Result<(), DeleteError> {
    fs::remove_file(path).map_err(|e| DeleteError::from_io(path, e))?;
    log::info!("Deleted duplicate file: {}", path.display());
    Ok(())
}

/// Move a single file to the system trash.
///
/// The file's existence is checked first so a missing file is reported as
/// `NotFound` rather than as a trash failure.
///
/// # Errors
///
/// See [`delete_file`].
pub fn delete_to_trash(path: &Path) -> Result<(), DeleteError> {
    fs::symlink_metadata(path).map_err(|e| DeleteError::from_io(path, e))?;

    trash::delete(path).map_err(|e| DeleteError::TrashFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("Moved duplicate file to trash: {}", path.display());
    Ok(())
}

/// Check that no planned removal reaches the survivor.
///
/// Merging removes each victim's sidecar, so a survivor that is itself the
/// sidecar of one of the victims would be destroyed along with it.
///
/// # Errors
///
/// Returns `SurvivorIsSidecar` if `keep` is `sidecar_of(victim)` for any victim.
///
/// # Example
///
/// ```
/// use dupe_sidecar::actions::delete::ensure_survivor_preserved;
/// use dupe_sidecar::actions::sidecar::SidecarExtension;
/// use std::path::{Path, PathBuf};
///
/// let ext = SidecarExtension::default();
/// let victims = vec![PathBuf::from("/d/x")];
/// assert!(ensure_survivor_preserved(Path::new("/e/x"), &victims, |v| ext.sidecar_for(v)).is_ok());
/// assert!(ensure_survivor_preserved(Path::new("/d/x.dupes"), &victims, |v| ext.sidecar_for(v)).is_err());
/// ```
pub fn ensure_survivor_preserved<F>(
    keep: &Path,
    victims: &[PathBuf],
    sidecar_of: F,
) -> Result<(), DeleteError>
where
    F: Fn(&Path) -> PathBuf,
{
    if let Some(owner) = victims.iter().find(|v| sidecar_of(v.as_path()) == keep) {
        log::error!(
            "Survivor {} is the sidecar of duplicate {}; skipping group",
            keep.display(),
            owner.display()
        );
        return Err(DeleteError::SurvivorIsSidecar {
            keep: keep.to_path_buf(),
            owner: owner.clone(),
        });
    }
    Ok(())
}
