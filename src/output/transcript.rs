//! Dry-run transcript.
//!
//! [`DryRunReport`] listens to the resolver and records, in plain text, every
//! action a real run would take. The engine makes the same decisions in both
//! modes, so the transcript is exactly what would happen.
//!
//! # Format
//!
//! ```text
//! Would keep file: /data/a/file.txt
//! Would delete duplicate file: /data/b/file.txt
//! Would merge existing sidecar file: /data/b/file.txt.dupes into /data/a/file.txt.dupes
//! Would delete sidecar file: /data/b/file.txt.dupes
//! Would create sidecar file: /data/a/file.txt.dupes with contents:
//!   /data/b/file.txt
//!   /old/file.txt
//!
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::actions::resolve::{DeleteStatus, ResolutionObserver, VictimSidecarFate};
use crate::actions::sidecar::{SidecarError, WriteMode};

/// Failure to save the transcript. Non-fatal for the run.
#[derive(Debug, Error)]
#[error("failed to write dry run output to {path}: {source}")]
pub struct TranscriptError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Accumulated dry-run transcript.
#[derive(Debug, Clone, Default)]
pub struct DryRunReport {
    lines: Vec<String>,
}

impl DryRunReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The transcript as one string, lines joined with `\n`.
    #[must_use]
    pub fn to_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Write the transcript to any writer.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from the writer.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(self.to_text().as_bytes())?;
        writer.flush()
    }

    /// Save the transcript to `path`, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns `TranscriptError` if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), TranscriptError> {
        fs::write(path, self.to_text()).map_err(|source| TranscriptError {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Dry run output written to {}", path.display());
        Ok(())
    }

    fn push(&mut self, line: String) {
        self.lines.push(line);
    }
}

impl ResolutionObserver for DryRunReport {
    fn on_keep(&mut self, keep: &Path) {
        self.push(format!("Would keep file: {}", keep.display()));
    }

    fn on_delete(&mut self, victim: &Path, _status: &DeleteStatus) {
        self.push(format!("Would delete duplicate file: {}", victim.display()));
    }

    fn on_merge_sidecar(&mut self, victim_sidecar: &Path, survivor_sidecar: &Path) {
        self.push(format!(
            "Would merge existing sidecar file: {} into {}",
            victim_sidecar.display(),
            survivor_sidecar.display()
        ));
    }

    fn on_sidecar_read_error(&mut self, victim_sidecar: &Path, error: &SidecarError) {
        let cause = match error {
            SidecarError::Read { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        self.push(format!(
            "Error reading existing sidecar file {}: {}",
            victim_sidecar.display(),
            cause
        ));
    }

    fn on_victim_sidecar(&mut self, victim_sidecar: &Path, fate: &VictimSidecarFate) {
        let verb = match fate {
            VictimSidecarFate::Retained => "Would not delete",
            VictimSidecarFate::Removed | VictimSidecarFate::RemoveFailed(_) => "Would delete",
        };
        self.push(format!("{} sidecar file: {}", verb, victim_sidecar.display()));
    }

    fn on_survivor_sidecar(&mut self, sidecar: &Path, mode: WriteMode, lines: &[String]) {
        let header = match mode {
            WriteMode::Create => "Would create sidecar file",
            WriteMode::Append => "Would append to sidecar file",
        };
        self.push(format!("{}: {} with contents:", header, sidecar.display()));
        for line in lines {
            self.push(format!("  {}", line));
        }
    }

    fn on_group_end(&mut self) {
        self.push(String::new());
    }
}
