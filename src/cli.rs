//! Command-line interface definitions for dupe-sidecar.
//!
//! This module defines all CLI arguments using the clap derive API. Flags
//! that correspond to configuration fields are optional here so that an
//! unset flag leaves the config file or environment value in effect.
//!
//! # Example
//!
//! ```bash
//! # Preview what would happen; /photos wins over /backup
//! dupe-sidecar --dry-run /photos /backup
//!
//! # Resolve for real without the confirmation prompt
//! dupe-sidecar --yes --progress /photos /backup
//!
//! # Reuse a saved jdupes report
//! jdupes --recurse --json /photos /backup > report.json
//! dupe-sidecar --from-report report.json /photos /backup
//! ```

use clap::Parser;
use std::path::PathBuf;

/// Resolve jdupes duplicate sets by directory priority, recording deleted
/// copies in sidecar files next to the survivors.
///
/// Directories are listed from highest to lowest priority: within each
/// duplicate set, the copy under the earliest directory is kept.
#[derive(Debug, Parser)]
#[command(name = "dupe-sidecar")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan, in priority order (first wins)
    #[arg(value_name = "DIRECTORIES", required = true, num_args = 1..)]
    pub directories: Vec<PathBuf>,

    /// Report what would be done without deleting or writing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Dry run report file (default: dry_run_output.txt)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Show a progress bar and let jdupes print its own progress
    #[arg(long)]
    pub progress: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,

    /// Read duplicate sets from a saved `jdupes --json` report instead of running jdupes
    #[arg(long, value_name = "FILE")]
    pub from_report: Option<PathBuf>,

    /// Path to the jdupes executable
    #[arg(long, value_name = "PATH")]
    pub jdupes_path: Option<PathBuf>,

    /// jdupes hash database file
    #[arg(long = "jdupes-hashdb", value_name = "FILE")]
    pub jdupes_hash_db: Option<PathBuf>,

    /// Extra argument passed to jdupes (can be specified multiple times)
    #[arg(long = "jdupes-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub jdupes_args: Vec<String>,

    /// Sidecar file extension (default: .dupes)
    #[arg(long, value_name = "EXT")]
    pub sidecar_extension: Option<String>,

    /// Let jdupes consider existing sidecar files as duplicates too
    #[arg(long)]
    pub no_exclude_sidecar: bool,

    /// Do not merge the sidecars of deleted files into the survivor's sidecar
    #[arg(long)]
    pub no_merge_existing_sidecars: bool,

    /// Keep the sidecars of deleted files after merging them
    #[arg(long)]
    pub no_delete_duplicate_sidecar: bool,

    /// Move duplicates to the system trash instead of deleting them
    #[arg(long)]
    pub trash: bool,
}
