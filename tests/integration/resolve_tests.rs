use dupe_sidecar::actions::{
    DeleteMode, DeleteStatus, FsSidecarStore, NoopObserver, ResolutionOutcome, ResolveOptions,
    Resolver, SidecarExtension, VictimSidecarFate, WriteMode,
};
use dupe_sidecar::duplicates::{DuplicateGroup, PriorityOrder};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn write(dir: &TempDir, rel: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn resolver(priority: &[PathBuf], options: ResolveOptions) -> Resolver<FsSidecarStore> {
    Resolver::new(
        PriorityOrder::new(priority),
        options,
        FsSidecarStore::default(),
    )
}

fn sidecar_of(path: &Path) -> PathBuf {
    SidecarExtension::default().sidecar_for(path)
}

fn line(path: &Path) -> String {
    path.display().to_string()
}

#[test]
fn test_keep_under_first_priority_directory() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "data/a/file.txt", b"same");
    let b = write(&dir, "data/b/file.txt", b"same");

    let r = resolver(&[dir.path().join("data/a")], ResolveOptions::default());
    let outcome = r.resolve(&DuplicateGroup::new(vec![b.clone(), a.clone()]), &mut NoopObserver);

    let res = outcome.resolution().unwrap();
    assert_eq!(res.keep, a);
    assert_eq!(res.victims, vec![(b.clone(), DeleteStatus::Deleted)]);
    assert!(a.exists());
    assert!(!b.exists());
}

#[test]
fn test_new_sidecar_has_exactly_one_line() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "data/a/file.txt", b"same");
    let b = write(&dir, "data/b/file.txt", b"same");

    let r = resolver(&[dir.path().join("data/a")], ResolveOptions::default());
    r.resolve(&DuplicateGroup::new(vec![a.clone(), b.clone()]), &mut NoopObserver);

    let content = fs::read_to_string(sidecar_of(&a)).unwrap();
    assert_eq!(content, format!("{}\n", line(&b)));
}

#[test]
fn test_victim_sidecar_merged_then_removed() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "data/a/file.txt", b"same");
    let b = write(&dir, "data/b/file.txt", b"same");
    let b_sidecar = write(&dir, "data/b/file.txt.dupes", b"/data/old/dup.txt\n");

    let r = resolver(&[dir.path().join("data/a")], ResolveOptions::default());
    let outcome = r.resolve(&DuplicateGroup::new(vec![a.clone(), b.clone()]), &mut NoopObserver);

    let content = fs::read_to_string(sidecar_of(&a)).unwrap();
    assert_eq!(content, format!("{}\n/data/old/dup.txt\n", line(&b)));
    assert!(!b_sidecar.exists());

    let res = outcome.resolution().unwrap();
    assert_eq!(res.merged_sidecars, vec![b_sidecar.clone()]);
    assert_eq!(
        res.victim_sidecars,
        vec![(b_sidecar, VictimSidecarFate::Removed)]
    );
}

#[test]
fn test_victim_sidecar_retained_when_requested() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "data/a/file.txt", b"same");
    let b = write(&dir, "data/b/file.txt", b"same");
    let b_sidecar = write(&dir, "data/b/file.txt.dupes", b"/data/old/dup.txt\n");

    let options = ResolveOptions::default().with_delete_sidecars(false);
    let r = resolver(&[dir.path().join("data/a")], options);
    r.resolve(&DuplicateGroup::new(vec![a.clone(), b.clone()]), &mut NoopObserver);

    assert_eq!(fs::read(&b_sidecar).unwrap(), b"/data/old/dup.txt\n");
    let content = fs::read_to_string(sidecar_of(&a)).unwrap();
    assert!(content.contains("/data/old/dup.txt"));
}

#[test]
fn test_merge_disabled_leaves_victim_sidecar_alone() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "data/a/file.txt", b"same");
    let b = write(&dir, "data/b/file.txt", b"same");
    let b_sidecar = write(&dir, "data/b/file.txt.dupes", b"/data/old/dup.txt\n");

    let options = ResolveOptions::default().with_merge_sidecars(false);
    let r = resolver(&[dir.path().join("data/a")], options);
    r.resolve(&DuplicateGroup::new(vec![a.clone(), b.clone()]), &mut NoopObserver);

    assert!(b_sidecar.exists());
    let content = fs::read_to_string(sidecar_of(&a)).unwrap();
    assert_eq!(content, format!("{}\n", line(&b)));
}

#[test]
fn test_multi_level_merge_by_repeated_application() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");
    let b = write(&dir, "b/f", b"same");
    let c = write(&dir, "c/f", b"same");

    // First run: b survives c
    let first = resolver(&[dir.path().join("b")], ResolveOptions::default());
    first.resolve(&DuplicateGroup::new(vec![c.clone(), b.clone()]), &mut NoopObserver);
    assert_eq!(
        fs::read_to_string(sidecar_of(&b)).unwrap(),
        format!("{}\n", line(&c))
    );

    // Second run: a survives b and inherits c's record
    let second = resolver(&[dir.path().join("a")], ResolveOptions::default());
    second.resolve(&DuplicateGroup::new(vec![b.clone(), a.clone()]), &mut NoopObserver);

    assert_eq!(
        fs::read_to_string(sidecar_of(&a)).unwrap(),
        format!("{}\n{}\n", line(&b), line(&c))
    );
    assert!(!sidecar_of(&b).exists());
    assert!(!b.exists() && !c.exists());
}

#[test]
fn test_append_inserts_missing_trailing_newline() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");
    let b = write(&dir, "b/f", b"same");
    write(&dir, "a/f.dupes", b"/earlier/copy");

    let r = resolver(&[dir.path().join("a")], ResolveOptions::default());
    let outcome = r.resolve(&DuplicateGroup::new(vec![a.clone(), b.clone()]), &mut NoopObserver);

    assert_eq!(
        outcome.resolution().unwrap().write_mode,
        Some(WriteMode::Append)
    );
    assert_eq!(
        fs::read_to_string(sidecar_of(&a)).unwrap(),
        format!("/earlier/copy\n{}\n", line(&b))
    );
}

#[test]
fn test_rerun_appends_duplicate_lines() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");
    let b = write(&dir, "b/f", b"same");
    let r = resolver(&[dir.path().join("a")], ResolveOptions::default());
    let group = DuplicateGroup::new(vec![a.clone(), b.clone()]);

    r.resolve(&group, &mut NoopObserver);
    write(&dir, "b/f", b"same");
    r.resolve(&group, &mut NoopObserver);

    let content = fs::read_to_string(sidecar_of(&a)).unwrap();
    assert_eq!(content, format!("{0}\n{0}\n", line(&b)));
}

#[test]
fn test_missing_victim_counts_as_already_absent() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");
    let gone = dir.path().join("b/f");

    let r = resolver(&[dir.path().join("a")], ResolveOptions::default());
    let summary = r.resolve_all(&[DuplicateGroup::new(vec![a.clone(), gone.clone()])]);

    assert_eq!(summary.files_already_absent, 1);
    assert!(!summary.has_errors());
    assert_eq!(
        fs::read_to_string(sidecar_of(&a)).unwrap(),
        format!("{}\n", line(&gone))
    );
}

#[test]
fn test_missing_victim_in_trash_mode_counts_as_already_absent() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");
    let gone = dir.path().join("b/f");

    let options = ResolveOptions::default().with_delete_mode(DeleteMode::Trash);
    let r = resolver(&[dir.path().join("a")], options);
    let outcome = r.resolve(&DuplicateGroup::new(vec![a, gone.clone()]), &mut NoopObserver);

    assert_eq!(
        outcome.resolution().unwrap().victims,
        vec![(gone, DeleteStatus::AlreadyAbsent)]
    );
}

#[test]
fn test_unreadable_victim_sidecar_is_still_removed() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");
    let b = write(&dir, "b/f", b"same");
    let b_sidecar = write(&dir, "b/f.dupes", &[0xff, 0xfe, 0x00, b'\n']);

    let r = resolver(&[dir.path().join("a")], ResolveOptions::default());
    let summary = r.resolve_all(&[DuplicateGroup::new(vec![a.clone(), b.clone()])]);

    assert!(!b_sidecar.exists());
    assert_eq!(summary.sidecar_errors, 1);
    assert!(summary.has_errors());
    assert_eq!(
        fs::read_to_string(sidecar_of(&a)).unwrap(),
        format!("{}\n", line(&b))
    );
}

#[test]
fn test_custom_sidecar_extension() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");
    let b = write(&dir, "b/f", b"same");

    let store = FsSidecarStore::new(SidecarExtension::new("seen").unwrap());
    let r = Resolver::new(
        PriorityOrder::new(&[dir.path().join("a")]),
        ResolveOptions::default(),
        store,
    );
    r.resolve(&DuplicateGroup::new(vec![a, b]), &mut NoopObserver);

    assert!(dir.path().join("a/f.seen").exists());
    assert!(!dir.path().join("a/f.dupes").exists());
}

#[test]
fn test_single_distinct_path_group_is_untouched() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");

    let r = resolver(&[dir.path().join("a")], ResolveOptions::default());
    let outcome = r.resolve(&DuplicateGroup::new(vec![a.clone(), a.clone()]), &mut NoopObserver);

    assert_eq!(outcome, ResolutionOutcome::Skipped { distinct: 1 });
    assert!(a.exists());
    assert!(!sidecar_of(&a).exists());
}

#[test]
fn test_groups_resolved_in_report_order() {
    let dir = tempdir().unwrap();
    let a1 = write(&dir, "a/one", b"1");
    let b1 = write(&dir, "b/one", b"1");
    let a2 = write(&dir, "a/two", b"2");
    let b2 = write(&dir, "b/two", b"2");

    let r = resolver(&[dir.path().join("b")], ResolveOptions::default());
    let summary = r.resolve_all(&[
        DuplicateGroup::new(vec![a1.clone(), b1.clone()]),
        DuplicateGroup::new(vec![a2.clone(), b2.clone()]),
    ]);

    assert_eq!(summary.groups_resolved, 2);
    assert_eq!(summary.files_deleted, 2);
    assert_eq!(summary.sidecars_written, 2);
    assert!(b1.exists() && b2.exists());
    assert!(!a1.exists() && !a2.exists());
}

#[test]
fn test_survivor_that_is_victim_sidecar_left_untouched() {
    let dir = tempdir().unwrap();
    let record = write(&dir, "d/x.dupes", b"same");
    let file = write(&dir, "d/x", b"same");

    let r = resolver(&[dir.path().join("d")], ResolveOptions::default());
    let summary = r.resolve_all(&[DuplicateGroup::new(vec![record.clone(), file.clone()])]);

    assert_eq!(summary.groups_refused, 1);
    assert_eq!(summary.groups_resolved, 0);
    assert!(summary.has_errors());
    assert_eq!(fs::read(&record).unwrap(), b"same");
    assert_eq!(fs::read(&file).unwrap(), b"same");
    assert!(!sidecar_of(&record).exists());
}
