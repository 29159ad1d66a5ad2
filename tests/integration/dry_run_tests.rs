use dupe_sidecar::actions::{FsSidecarStore, NoopObserver, ResolveOptions, Resolver};
use dupe_sidecar::duplicates::{DuplicateGroup, PriorityOrder};
use dupe_sidecar::output::DryRunReport;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn write(dir: &TempDir, rel: &str, content: &[u8]) -> PathBuf {
    let path = dir.path().join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// Every file under `root` with its bytes.
fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    let mut files = BTreeMap::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                files.insert(path.clone(), fs::read(&path).unwrap());
            }
        }
    }
    files
}

fn dry_run(dir: &TempDir, priority: &str, groups: &[DuplicateGroup], options: ResolveOptions) -> DryRunReport {
    let resolver = Resolver::new(
        PriorityOrder::new(&[dir.path().join(priority)]),
        options.with_dry_run(true),
        FsSidecarStore::default(),
    );
    let mut report = DryRunReport::new();
    for group in groups {
        resolver.resolve(group, &mut report);
    }
    report
}

#[test]
fn test_dry_run_leaves_filesystem_unchanged() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");
    let b = write(&dir, "b/f", b"same");
    write(&dir, "b/f.dupes", b"/old/one\n");
    write(&dir, "a/f.dupes", b"/older");

    let before = snapshot(dir.path());
    dry_run(&dir, "a", &[DuplicateGroup::new(vec![b, a])], ResolveOptions::default());
    let after = snapshot(dir.path());

    assert_eq!(before, after);
}

#[test]
fn test_dry_run_transcript_lines() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");
    let b = write(&dir, "b/f", b"same");
    let b_sidecar = write(&dir, "b/f.dupes", b"/old/one\n");
    let a_sidecar = dir.path().join("a/f.dupes");

    let report = dry_run(
        &dir,
        "a",
        &[DuplicateGroup::new(vec![b.clone(), a.clone()])],
        ResolveOptions::default(),
    );

    let expected = vec![
        format!("Would keep file: {}", a.display()),
        format!("Would delete duplicate file: {}", b.display()),
        format!(
            "Would merge existing sidecar file: {} into {}",
            b_sidecar.display(),
            a_sidecar.display()
        ),
        format!("Would delete sidecar file: {}", b_sidecar.display()),
        format!("Would create sidecar file: {} with contents:", a_sidecar.display()),
        format!("  {}", b.display()),
        "  /old/one".to_string(),
        String::new(),
    ];
    assert_eq!(report.lines(), expected.as_slice());
}

#[test]
fn test_dry_run_matches_real_run_decision() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "x/a/f", b"same");
    let b = write(&dir, "x/b/f", b"same");
    let c = write(&dir, "y/f", b"same");
    let groups = [DuplicateGroup::new(vec![c.clone(), b.clone(), a.clone()])];

    let report = dry_run(&dir, "x/b", &groups, ResolveOptions::default());
    let keeps: Vec<_> = report
        .lines()
        .iter()
        .filter(|l| l.starts_with("Would keep file: "))
        .collect();
    assert_eq!(keeps, vec![&format!("Would keep file: {}", b.display())]);
    let deletes = report
        .lines()
        .iter()
        .filter(|l| l.starts_with("Would delete duplicate file: "))
        .count();
    assert_eq!(deletes, 2);

    let real = Resolver::new(
        PriorityOrder::new(&[dir.path().join("x/b")]),
        ResolveOptions::default(),
        FsSidecarStore::default(),
    );
    real.resolve(&groups[0], &mut NoopObserver);

    assert!(b.exists());
    assert!(!a.exists());
    assert!(!c.exists());
}

#[test]
fn test_dry_run_append_and_retained_wording() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");
    let b = write(&dir, "b/f", b"same");
    let b_sidecar = write(&dir, "b/f.dupes", b"/old/one\n");
    let a_sidecar = write(&dir, "a/f.dupes", b"/older\n");

    let report = dry_run(
        &dir,
        "a",
        &[DuplicateGroup::new(vec![a, b])],
        ResolveOptions::default().with_delete_sidecars(false),
    );

    let lines = report.lines();
    assert!(lines.contains(&format!("Would not delete sidecar file: {}", b_sidecar.display())));
    assert!(lines.contains(&format!(
        "Would append to sidecar file: {} with contents:",
        a_sidecar.display()
    )));
}

#[test]
fn test_dry_run_reports_unreadable_sidecar() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");
    let b = write(&dir, "b/f", b"same");
    let b_sidecar = write(&dir, "b/f.dupes", &[0xff, 0xfe]);

    let report = dry_run(&dir, "a", &[DuplicateGroup::new(vec![a, b])], ResolveOptions::default());

    let prefix = format!("Error reading existing sidecar file {}: ", b_sidecar.display());
    assert!(report.lines().iter().any(|l| l.starts_with(&prefix)));
    // The removal is still planned
    assert!(report
        .lines()
        .contains(&format!("Would delete sidecar file: {}", b_sidecar.display())));
}

#[test]
fn test_single_path_group_produces_no_lines() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");

    let report = dry_run(
        &dir,
        "a",
        &[DuplicateGroup::new(vec![a.clone()]), DuplicateGroup::new(vec![])],
        ResolveOptions::default(),
    );

    assert!(report.is_empty());
}

#[test]
fn test_report_saved_and_overwritten() {
    let dir = tempdir().unwrap();
    let a = write(&dir, "a/f", b"same");
    let b = write(&dir, "b/f", b"same");
    let out = write(&dir, "out/report.txt", b"previous run\nwith more lines\n");

    let report = dry_run(&dir, "a", &[DuplicateGroup::new(vec![a.clone(), b])], ResolveOptions::default());
    report.save(&out).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.starts_with(&format!("Would keep file: {}\n", a.display())));
    assert!(!text.contains("previous run"));
    assert_eq!(text, report.lines().join("\n"));
}
