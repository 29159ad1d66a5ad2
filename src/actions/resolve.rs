//! Duplicate-group resolution: choose a survivor, delete the rest, and
//! record provenance in the survivor's sidecar.
//!
//! # Overview
//!
//! For each group, in order:
//!
//! 1. Order the paths by directory priority. Groups with fewer than two
//!    distinct paths are skipped without any event. A group whose survivor is
//!    the sidecar of one of its victims is refused and left untouched.
//! 2. Delete every victim (skipped in dry run). A victim that is already gone
//!    counts as deleted; any other failure is logged and the victim is left
//!    in place. Nothing here aborts the group.
//! 3. Collect sidecar lines: each victim's own path, followed by the lines of
//!    its existing sidecar when merging is enabled. Merged victim sidecars are
//!    deleted afterwards unless retention was requested.
//! 4. Write all collected lines to the survivor's sidecar in one append.
//!
//! Every step is reported to a [`ResolutionObserver`], which is how the
//! dry-run transcript is produced without the engine doing any I/O of its own
//! beyond the filesystem work it is asked to do.
//!
//! # Example
//!
//! ```no_run
//! use dupe_sidecar::actions::resolve::{NoopObserver, ResolveOptions, Resolver};
//! use dupe_sidecar::actions::sidecar::FsSidecarStore;
//! use dupe_sidecar::duplicates::{DuplicateGroup, PriorityOrder};
//! use std::path::PathBuf;
//!
//! let resolver = Resolver::new(
//!     PriorityOrder::new(&[PathBuf::from("/data/a")]),
//!     ResolveOptions::default(),
//!     FsSidecarStore::default(),
//! );
//! let group = DuplicateGroup::new(vec![
//!     PathBuf::from("/data/b/file.txt"),
//!     PathBuf::from("/data/a/file.txt"),
//! ]);
//! let outcome = resolver.resolve(&group, &mut NoopObserver);
//! ```

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use super::delete::{delete_file, ensure_survivor_preserved, DeleteMode};
use super::sidecar::{SidecarError, SidecarStore, WriteMode};
use crate::duplicates::{DuplicateGroup, PriorityOrder};

/// Behaviour switches for resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Pull existing victim sidecars into the survivor's sidecar.
    pub merge_sidecars: bool,
    /// Delete victim sidecars once merged.
    pub delete_sidecars: bool,
    /// Report what would happen without touching the filesystem.
    pub dry_run: bool,
    /// How victims are removed.
    pub delete_mode: DeleteMode,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            merge_sidecars: true,
            delete_sidecars: true,
            dry_run: false,
            delete_mode: DeleteMode::Permanent,
        }
    }
}

impl ResolveOptions {
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn with_merge_sidecars(mut self, merge: bool) -> Self {
        self.merge_sidecars = merge;
        self
    }

    #[must_use]
    pub fn with_delete_sidecars(mut self, delete: bool) -> Self {
        self.delete_sidecars = delete;
        self
    }

    #[must_use]
    pub fn with_delete_mode(mut self, mode: DeleteMode) -> Self {
        self.delete_mode = mode;
        self
    }
}

/// What happened to one victim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteStatus {
    /// Dry run: would be deleted.
    Planned,
    Deleted,
    /// Was already gone; the deletion is satisfied.
    AlreadyAbsent,
    /// Left in place after an error.
    Failed(String),
}

/// What happened to a victim's sidecar after its lines were merged.
///
/// In dry run, `Removed` means "would be removed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VictimSidecarFate {
    Removed,
    Retained,
    RemoveFailed(String),
}

/// Receives every action the resolver takes (or would take), in order.
///
/// All methods default to doing nothing.
pub trait ResolutionObserver {
    fn on_keep(&mut self, _keep: &Path) {}

    fn on_delete(&mut self, _victim: &Path, _status: &DeleteStatus) {}

    fn on_merge_sidecar(&mut self, _victim_sidecar: &Path, _survivor_sidecar: &Path) {}

    fn on_sidecar_read_error(&mut self, _victim_sidecar: &Path, _error: &SidecarError) {}

    fn on_victim_sidecar(&mut self, _victim_sidecar: &Path, _fate: &VictimSidecarFate) {}

    /// The survivor sidecar was (or would be) written with `lines`.
    fn on_survivor_sidecar(&mut self, _sidecar: &Path, _mode: WriteMode, _lines: &[String]) {}

    fn on_group_end(&mut self) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ResolutionObserver for NoopObserver {}

/// Record of one resolved group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupResolution {
    pub keep: PathBuf,
    pub victims: Vec<(PathBuf, DeleteStatus)>,
    /// Victim sidecars whose lines were merged
    pub merged_sidecars: Vec<PathBuf>,
    pub victim_sidecars: Vec<(PathBuf, VictimSidecarFate)>,
    /// Sidecar read, remove and write failures
    pub sidecar_errors: Vec<(PathBuf, String)>,
    pub survivor_sidecar: PathBuf,
    /// Lines appended (or to be appended) to the survivor sidecar
    pub sidecar_lines: Vec<String>,
    /// `None` if the survivor sidecar write failed
    pub write_mode: Option<WriteMode>,
}

impl GroupResolution {
    fn new(keep: &Path, survivor_sidecar: PathBuf) -> Self {
        Self {
            keep: keep.to_path_buf(),
            victims: Vec::new(),
            merged_sidecars: Vec::new(),
            victim_sidecars: Vec::new(),
            sidecar_errors: Vec::new(),
            survivor_sidecar,
            sidecar_lines: Vec::new(),
            write_mode: None,
        }
    }

    fn count(&self, pred: impl Fn(&DeleteStatus) -> bool) -> usize {
        self.victims.iter().filter(|(_, s)| pred(s)).count()
    }

    #[must_use]
    pub fn deleted_count(&self) -> usize {
        self.count(|s| matches!(s, DeleteStatus::Deleted))
    }

    #[must_use]
    pub fn already_absent_count(&self) -> usize {
        self.count(|s| matches!(s, DeleteStatus::AlreadyAbsent))
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.count(|s| matches!(s, DeleteStatus::Failed(_)))
    }

    #[must_use]
    pub fn planned_count(&self) -> usize {
        self.count(|s| matches!(s, DeleteStatus::Planned))
    }
}

/// Result of resolving one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Fewer than two distinct paths; nothing to do.
    Skipped { distinct: usize },
    /// The survivor is the sidecar of one of the victims; nothing was touched.
    Refused { keep: PathBuf, reason: String },
    Resolved(GroupResolution),
}

impl ResolutionOutcome {
    #[must_use]
    pub fn resolution(&self) -> Option<&GroupResolution> {
        match self {
            Self::Resolved(r) => Some(r),
            _ => None,
        }
    }
}

/// Applies directory priority and sidecar bookkeeping to duplicate groups.
#[derive(Debug, Clone)]
pub struct Resolver<S: SidecarStore> {
    order: PriorityOrder,
    options: ResolveOptions,
    store: S,
}

impl<S: SidecarStore> Resolver<S> {
    #[must_use]
    pub fn new(order: PriorityOrder, options: ResolveOptions, store: S) -> Self {
        Self {
            order,
            options,
            store,
        }
    }

    #[must_use]
    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve every group in order, without an observer.
    pub fn resolve_all(&self, groups: &[DuplicateGroup]) -> RunSummary {
        let mut summary = RunSummary::default();
        for group in groups {
            summary.record(&self.resolve(group, &mut NoopObserver));
        }
        summary
    }

    /// Resolve one group. Per-file failures are logged and recorded in the
    /// outcome; none of them stop the group.
    pub fn resolve<O: ResolutionObserver + ?Sized>(
        &self,
        group: &DuplicateGroup,
        observer: &mut O,
    ) -> ResolutionOutcome {
        let ordered = self.order.order(group);
        let keep = match ordered.keep() {
            Some(keep) if ordered.is_actionable() => keep,
            _ => {
                log::debug!("Skipping group with {} distinct path(s)", ordered.len());
                return ResolutionOutcome::Skipped {
                    distinct: ordered.len(),
                };
            }
        };
        let victims = ordered.victims();

        let guard = ensure_survivor_preserved(keep, victims, |v| self.store.sidecar_path(v));
        if let Err(e) = guard {
            return ResolutionOutcome::Refused {
                keep: keep.to_path_buf(),
                reason: e.to_string(),
            };
        }

        let dry_run = self.options.dry_run;
        let mut resolution = GroupResolution::new(keep, self.store.sidecar_path(keep));

        if dry_run {
            log::debug!("Would keep file: {}", keep.display());
        } else {
            log::debug!("Keeping file: {}", keep.display());
        }
        observer.on_keep(keep);

        for victim in victims {
            let status = self.delete_victim(victim);
            observer.on_delete(victim, &status);
            resolution.victims.push((victim.clone(), status));
        }

        for victim in victims {
            let line = victim.to_string_lossy();
            if matches!(line, Cow::Owned(_)) {
                log::warn!(
                    "Path is not valid UTF-8, recording it lossily in {}: {}",
                    resolution.survivor_sidecar.display(),
                    line
                );
            }
            resolution.sidecar_lines.push(line.into_owned());
            if self.options.merge_sidecars && self.store.exists(victim) {
                self.merge_victim_sidecar(victim, &mut resolution, observer);
            }
        }

        self.write_survivor_sidecar(keep, &mut resolution, observer);
        observer.on_group_end();

        ResolutionOutcome::Resolved(resolution)
    }

    fn delete_victim(&self, victim: &Path) -> DeleteStatus {
        if self.options.dry_run {
            log::debug!("Would delete duplicate file: {}", victim.display());
            return DeleteStatus::Planned;
        }

        match delete_file(victim, self.options.delete_mode) {
            Ok(()) => DeleteStatus::Deleted,
            Err(e) if e.is_not_found() => {
                log::warn!(
                    "File not found when attempting to delete {}; treating as already deleted",
                    victim.display()
                );
                DeleteStatus::AlreadyAbsent
            }
            Err(e) => {
                log::error!("Failed to delete {}: {}", victim.display(), e);
                DeleteStatus::Failed(e.to_string())
            }
        }
    }

    fn merge_victim_sidecar<O: ResolutionObserver + ?Sized>(
        &self,
        victim: &Path,
        resolution: &mut GroupResolution,
        observer: &mut O,
    ) {
        let victim_sidecar = self.store.sidecar_path(victim);
        log::info!(
            "{}erging existing sidecar file: {} into {}",
            if self.options.dry_run { "Would m" } else { "M" },
            victim_sidecar.display(),
            resolution.survivor_sidecar.display()
        );
        observer.on_merge_sidecar(&victim_sidecar, &resolution.survivor_sidecar);

        match self.store.read_lines(victim) {
            Ok(lines) => {
                resolution.sidecar_lines.extend(lines);
                resolution.merged_sidecars.push(victim_sidecar.clone());
            }
            Err(e) => {
                // Still attempt the removal below.
                log::error!("Error reading existing sidecar file: {}", e);
                observer.on_sidecar_read_error(&victim_sidecar, &e);
                resolution
                    .sidecar_errors
                    .push((victim_sidecar.clone(), e.to_string()));
            }
        }

        let fate = if !self.options.delete_sidecars {
            log::info!("Retained sidecar file: {}", victim_sidecar.display());
            VictimSidecarFate::Retained
        } else if self.options.dry_run {
            VictimSidecarFate::Removed
        } else {
            match self.store.remove(victim) {
                Ok(()) => {
                    log::info!("Deleted sidecar file: {}", victim_sidecar.display());
                    VictimSidecarFate::Removed
                }
                Err(e) => {
                    log::error!("{}", e);
                    resolution
                        .sidecar_errors
                        .push((victim_sidecar.clone(), e.to_string()));
                    VictimSidecarFate::RemoveFailed(e.to_string())
                }
            }
        };

        observer.on_victim_sidecar(&victim_sidecar, &fate);
        resolution.victim_sidecars.push((victim_sidecar, fate));
    }

    fn write_survivor_sidecar<O: ResolutionObserver + ?Sized>(
        &self,
        keep: &Path,
        resolution: &mut GroupResolution,
        observer: &mut O,
    ) {
        let sidecar = resolution.survivor_sidecar.clone();

        let mode = if self.options.dry_run {
            if self.store.exists(keep) {
                WriteMode::Append
            } else {
                WriteMode::Create
            }
        } else {
            match self.store.append_lines(keep, &resolution.sidecar_lines) {
                Ok(mode) => {
                    match mode {
                        WriteMode::Append => {
                            log::info!("Appended to existing sidecar file: {}", sidecar.display())
                        }
                        WriteMode::Create => {
                            log::info!("Created new sidecar file: {}", sidecar.display())
                        }
                    }
                    mode
                }
                Err(e) => {
                    log::error!("{}", e);
                    resolution.sidecar_errors.push((sidecar, e.to_string()));
                    return;
                }
            }
        };

        observer.on_survivor_sidecar(&sidecar, mode, &resolution.sidecar_lines);
        resolution.write_mode = Some(mode);
    }
}

/// Totals across all groups of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub groups_total: usize,
    pub groups_resolved: usize,
    pub groups_skipped: usize,
    pub groups_refused: usize,
    pub files_deleted: usize,
    pub files_already_absent: usize,
    pub files_planned: usize,
    pub delete_failures: usize,
    pub sidecars_merged: usize,
    pub sidecars_written: usize,
    pub sidecar_errors: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &ResolutionOutcome) {
        self.groups_total += 1;
        match outcome {
            ResolutionOutcome::Skipped { .. } => self.groups_skipped += 1,
            ResolutionOutcome::Refused { .. } => self.groups_refused += 1,
            ResolutionOutcome::Resolved(r) => {
                self.groups_resolved += 1;
                self.files_deleted += r.deleted_count();
                self.files_already_absent += r.already_absent_count();
                self.files_planned += r.planned_count();
                self.delete_failures += r.failed_count();
                self.sidecars_merged += r.merged_sidecars.len();
                self.sidecar_errors += r.sidecar_errors.len();
                if r.write_mode.is_some() {
                    self.sidecars_written += 1;
                }
            }
        }
    }

    /// Any per-file failure during the run.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.delete_failures > 0 || self.sidecar_errors > 0 || self.groups_refused > 0
    }

    /// Human-readable summary of the run.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut text = if self.files_planned > 0 {
            format!(
                "Resolved {} duplicate set(s): would delete {} file(s), merge {} sidecar(s)",
                self.groups_resolved, self.files_planned, self.sidecars_merged
            )
        } else {
            format!(
                "Resolved {} duplicate set(s): deleted {} file(s), merged {} sidecar(s), wrote {} sidecar(s)",
                self.groups_resolved, self.files_deleted, self.sidecars_merged, self.sidecars_written
            )
        };
        if self.files_already_absent > 0 {
            text.push_str(&format!(", {} already absent", self.files_already_absent));
        }
        if self.has_errors() {
            text.push_str(&format!(
                ", {} delete failure(s), {} sidecar error(s), {} refused set(s)",
                self.delete_failures, self.sidecar_errors, self.groups_refused
            ));
        }
        text
    }
}
