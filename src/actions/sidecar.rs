//! Sidecar files: plain-text provenance records next to surviving files.
//!
//! A sidecar for `/data/a/file.txt` with the default extension lives at
//! `/data/a/file.txt.dupes` and holds one path per line, naming every file
//! that was deleted in favour of the survivor (directly, or inherited from a
//! merged sidecar).
//!
//! # Example
//!
//! ```
//! use dupe_sidecar::actions::sidecar::{FsSidecarStore, SidecarExtension, SidecarStore, WriteMode};
//! use std::path::Path;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let keep = dir.path().join("file.txt");
//! let store = FsSidecarStore::new(SidecarExtension::default());
//!
//! let mode = store.append_lines(&keep, &["/old/file.txt".to_string()]).unwrap();
//! assert_eq!(mode, WriteMode::Create);
//! assert_eq!(store.read_lines(&keep).unwrap(), vec!["/old/file.txt"]);
//! ```

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default sidecar extension.
pub const DEFAULT_SIDECAR_EXTENSION: &str = ".dupes";

/// Errors from sidecar operations. None of these abort a run.
#[derive(Debug, Error)]
pub enum SidecarError {
    /// The configured extension has no usable characters.
    #[error("invalid sidecar extension {0:?}: must contain at least one character besides '.'")]
    InvalidExtension(String),

    /// The sidecar could not be read (missing, unreadable, or not UTF-8).
    #[error("failed to read sidecar {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The sidecar could not be created or appended to.
    #[error("failed to write sidecar {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The sidecar could not be removed.
    #[error("failed to delete sidecar {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A sidecar file extension, normalized to start with a single `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidecarExtension {
    dotted: String,
}

impl SidecarExtension {
    /// Normalize a user-supplied extension.
    ///
    /// `dupes`, `.dupes` and `..dupes` all become `.dupes`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidExtension` if nothing remains after stripping dots.
    ///
    /// # Example
    ///
    /// ```
    /// use dupe_sidecar::actions::sidecar::SidecarExtension;
    ///
    /// let ext = SidecarExtension::new("dupes").unwrap();
    /// assert_eq!(ext.as_suffix(), ".dupes");
    /// assert_eq!(ext.without_dot(), "dupes");
    /// assert!(SidecarExtension::new(".").is_err());
    /// ```
    pub fn new(raw: &str) -> Result<Self, SidecarError> {
        let bare = raw.trim().trim_start_matches('.');
        if bare.is_empty() {
            return Err(SidecarError::InvalidExtension(raw.to_string()));
        }
        Ok(Self {
            dotted: format!(".{bare}"),
        })
    }

    /// The extension as appended to file names (with leading `.`).
    #[must_use]
    pub fn as_suffix(&self) -> &str {
        &self.dotted
    }

    /// The extension without its leading `.`, as the scanner's filter expects it.
    #[must_use]
    pub fn without_dot(&self) -> &str {
        &self.dotted[1..]
    }

    /// Sidecar path for `file`: the full file name plus the extension.
    #[must_use]
    pub fn sidecar_for(&self, file: &Path) -> PathBuf {
        let mut name: OsString = file.as_os_str().to_owned();
        name.push(&self.dotted);
        PathBuf::from(name)
    }
}

impl Default for SidecarExtension {
    fn default() -> Self {
        Self {
            dotted: DEFAULT_SIDECAR_EXTENSION.to_string(),
        }
    }
}

impl std::fmt::Display for SidecarExtension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.dotted)
    }
}

/// Whether a survivor sidecar was freshly created or extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Create,
    Append,
}

/// Storage for sidecars, addressed by the file they belong to.
pub trait SidecarStore {
    /// Path of the sidecar belonging to `owner`.
    fn sidecar_path(&self, owner: &Path) -> PathBuf;

    /// Whether `owner` currently has a sidecar.
    fn exists(&self, owner: &Path) -> bool;

    /// Read every line of `owner`'s sidecar, in file order.
    fn read_lines(&self, owner: &Path) -> Result<Vec<String>, SidecarError>;

    /// Append `lines` to `owner`'s sidecar, creating it if needed.
    fn append_lines(&self, owner: &Path, lines: &[String]) -> Result<WriteMode, SidecarError>;

    /// Delete `owner`'s sidecar.
    fn remove(&self, owner: &Path) -> Result<(), SidecarError>;
}

/// Sidecars stored on the local filesystem next to their owners.
#[derive(Debug, Clone, Default)]
pub struct FsSidecarStore {
    extension: SidecarExtension,
}

impl FsSidecarStore {
    #[must_use]
    pub fn new(extension: SidecarExtension) -> Self {
        Self { extension }
    }

    #[must_use]
    pub fn extension(&self) -> &SidecarExtension {
        &self.extension
    }
}

impl SidecarStore for FsSidecarStore {
    fn sidecar_path(&self, owner: &Path) -> PathBuf {
        self.extension.sidecar_for(owner)
    }

    fn exists(&self, owner: &Path) -> bool {
        self.sidecar_path(owner).is_file()
    }

    fn read_lines(&self, owner: &Path) -> Result<Vec<String>, SidecarError> {
        let path = self.sidecar_path(owner);
        let content = fs::read_to_string(&path).map_err(|source| SidecarError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(content.lines().map(str::to_owned).collect())
    }

    fn append_lines(&self, owner: &Path, lines: &[String]) -> Result<WriteMode, SidecarError> {
        let path = self.sidecar_path(owner);
        let write_err = |source: io::Error| SidecarError::Write {
            path: path.clone(),
            source,
        };

        let mode = if path.exists() {
            WriteMode::Append
        } else {
            WriteMode::Create
        };

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .map_err(write_err)?;

        let needs_separator =
            mode == WriteMode::Append && !ends_with_newline(&mut file).map_err(write_err)?;

        let mut writer = BufWriter::new(file);
        if needs_separator {
            writer.write_all(b"\n").map_err(write_err)?;
        }
        for line in lines {
            writer.write_all(line.as_bytes()).map_err(write_err)?;
            writer.write_all(b"\n").map_err(write_err)?;
        }
        writer.flush().map_err(write_err)?;

        Ok(mode)
    }

    fn remove(&self, owner: &Path) -> Result<(), SidecarError> {
        let path = self.sidecar_path(owner);
        fs::remove_file(&path).map_err(|source| SidecarError::Remove { path, source })
    }
}

/// An empty file counts as newline-terminated.
fn ends_with_newline(file: &mut fs::File) -> io::Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::Start(len - 1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
