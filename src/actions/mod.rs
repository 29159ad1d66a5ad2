//! File actions module.
//!
//! This module provides functionality for:
//! - Removing victims permanently or via the system trash
//! - Reading, appending to and removing sidecar files
//! - Resolving a duplicate group end to end
//!
//! # Resolution
//!
//! ```no_run
//! use dupe_sidecar::actions::{FsSidecarStore, NoopObserver, ResolveOptions, Resolver};
//! use dupe_sidecar::duplicates::{DuplicateGroup, PriorityOrder};
//! use std::path::PathBuf;
//!
//! let resolver = Resolver::new(
//!     PriorityOrder::new(&[PathBuf::from("/photos")]),
//!     ResolveOptions::default().with_dry_run(true),
//!     FsSidecarStore::default(),
//! );
//! let summary = resolver.resolve_all(&[DuplicateGroup::new(vec![
//!     PathBuf::from("/backup/a.jpg"),
//!     PathBuf::from("/photos/a.jpg"),
//! ])]);
//! println!("{}", summary.summary());
//! ```

pub mod delete;
pub mod resolve;
pub mod sidecar;

// Re-export commonly used types
pub use delete::{delete_file, ensure_survivor_preserved, DeleteError, DeleteMode};
pub use resolve::{
    DeleteStatus, GroupResolution, NoopObserver, ResolutionObserver, ResolutionOutcome,
    ResolveOptions, Resolver, RunSummary, VictimSidecarFate,
};
pub use sidecar::{
    FsSidecarStore, SidecarError, SidecarExtension, SidecarStore, WriteMode,
    DEFAULT_SIDECAR_EXTENSION,
};
