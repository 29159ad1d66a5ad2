//! `jdupes` invocation and saved-report input.

use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{validate_directories, DuplicateScanner, ScanError, ScannerConfig};
use crate::duplicates::{read_report, DuplicateGroup};

/// Executable looked up on `PATH` when none is configured.
pub const DEFAULT_JDUPES_PATH: &str = "jdupes";

/// Runs `jdupes` once over all roots and parses its JSON report.
#[derive(Debug, Clone, Default)]
pub struct JdupesScanner {
    config: ScannerConfig,
}

impl JdupesScanner {
    #[must_use]
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Full argument list for scanning `dirs`, excluding the program name.
    ///
    /// `--param-order` makes report order follow argument order, so the
    /// directories come last.
    #[must_use]
    pub fn command_args(&self, dirs: &[PathBuf]) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--param-order".into(),
            "--recurse".into(),
            "--json".into(),
        ];

        if let Some(db) = &self.config.hash_db {
            let mut arg = OsString::from("--hash-db=");
            arg.push(db.as_os_str());
            args.push(arg);
        }

        if let Some(ext) = &self.config.exclude_extension {
            args.push(format!("--ext-filter=noext:{}", ext.without_dot()).into());
        }

        args.extend(self.config.extra_args.iter().map(OsString::from));
        args.extend(dirs.iter().map(|d| d.as_os_str().to_owned()));
        args
    }

    fn warn_on_conflicting_filters(&self) {
        if self.config.exclude_extension.is_none() {
            return;
        }
        let conflicting = self
            .config
            .extra_args
            .iter()
            .any(|a| a.starts_with("--ext-filter") || a.starts_with("-X"));
        if conflicting {
            log::warn!(
                "Extra jdupes arguments contain an extension filter; \
                 it may interact with the sidecar exclusion filter"
            );
        }
    }

    fn log_stderr(&self, stderr: &[u8], failed: bool) {
        for line in String::from_utf8_lossy(stderr).lines() {
            if line.trim().is_empty() {
                continue;
            }
            if failed {
                log::error!("jdupes: {}", line);
            } else {
                log::debug!("jdupes: {}", line);
            }
        }
    }
}

impl DuplicateScanner for JdupesScanner {
    fn scan(&self, dirs: &[PathBuf]) -> Result<Vec<DuplicateGroup>, ScanError> {
        validate_directories(dirs)?;
        self.warn_on_conflicting_filters();

        let program = &self.config.program;
        let args = self.command_args(dirs);
        log::info!(
            "Running {} {}",
            program.display(),
            args.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );

        let stderr = if self.config.passthrough_stderr {
            Stdio::inherit()
        } else {
            Stdio::piped()
        };
        let output = Command::new(program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(stderr)
            .output()
            .map_err(|source| ScanError::Launch {
                program: program.clone(),
                source,
            })?;

        self.log_stderr(&output.stderr, !output.status.success());
        if !output.status.success() {
            return Err(ScanError::ExitStatus {
                program: program.clone(),
                status: output.status.to_string(),
            });
        }

        let groups = read_report(output.stdout.as_slice())?;
        log::debug!("jdupes reported {} duplicate set(s)", groups.len());
        Ok(groups)
    }
}

/// Reads a stored `jdupes --json` report instead of running the finder.
///
/// The roots passed to [`scan`](DuplicateScanner::scan) are not consulted;
/// they still drive priority ordering.
#[derive(Debug, Clone)]
pub struct ReportFileScanner {
    path: PathBuf,
}

impl ReportFileScanner {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DuplicateScanner for ReportFileScanner {
    fn scan(&self, _dirs: &[PathBuf]) -> Result<Vec<DuplicateGroup>, ScanError> {
        log::info!("Reading duplicate report from {}", self.path.display());
        let file = File::open(&self.path).map_err(|source| ScanError::ReadReport {
            path: self.path.clone(),
            source,
        })?;
        Ok(read_report(BufReader::new(file))?)
    }
}
