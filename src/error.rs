//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for dupe-sidecar.
///
/// - 0: Success (duplicate sets resolved, or the user cancelled)
/// - 1: General error (scanner failure, malformed report, bad configuration)
/// - 2: No duplicates found
/// - 3: Partial success (some files or sidecars could not be processed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: every duplicate set was handled.
    Success = 0,
    /// General error: the run stopped before modifying anything.
    GeneralError = 1,
    /// No duplicates: the scanner reported no duplicate sets.
    NoDuplicates = 2,
    /// Partial success: the run finished but some per-file actions failed.
    PartialSuccess = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::NoDuplicates => "DS002",
            Self::PartialSuccess => "DS003",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including its causes
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{:#}", err),
        }
    }
}
