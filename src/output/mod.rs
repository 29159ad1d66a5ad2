//! Output produced by a run.
//!
//! Currently the dry-run transcript, which records what a real run would do.
//!
//! # Example
//!
//! ```no_run
//! use dupe_sidecar::actions::{FsSidecarStore, ResolveOptions, Resolver};
//! use dupe_sidecar::duplicates::{DuplicateGroup, PriorityOrder};
//! use dupe_sidecar::output::DryRunReport;
//! use std::path::{Path, PathBuf};
//!
//! let resolver = Resolver::new(
//!     PriorityOrder::new(&[PathBuf::from("/data/a")]),
//!     ResolveOptions::default().with_dry_run(true),
//!     FsSidecarStore::default(),
//! );
//! let mut report = DryRunReport::new();
//! let group = DuplicateGroup::new(vec![PathBuf::from("/data/b/f"), PathBuf::from("/data/a/f")]);
//! resolver.resolve(&group, &mut report);
//! report.save(Path::new("dry_run_output.txt")).unwrap();
//! ```

pub mod transcript;

pub use transcript::{DryRunReport, TranscriptError};
