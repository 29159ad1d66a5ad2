use dupe_sidecar::duplicates::{parse_report, MalformedReportError};
use dupe_sidecar::scanner::{DuplicateScanner, ReportFileScanner, ScanError};
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_saved_report_round_trip_through_scanner() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    fs::write(
        &path,
        r#"{
  "jdupesVersion": "1.27.3",
  "jdupesVersionDate": "2023-08-26",
  "commandLine": "jdupes --json -r /data",
  "extensionFlags": "hashdb",
  "matchSets": [
    {
      "fileSize": 5,
      "fileList": [
        { "filePath": "/data/a/one.txt" },
        { "filePath": "/data/b/one.txt" }
      ]
    },
    {
      "fileSize": 9,
      "fileList": [
        { "filePath": "/data/b/two.txt" },
        { "filePath": "/data/c/two.txt" },
        { "filePath": "/data/a/two.txt" }
      ]
    }
  ]
}"#,
    )
    .unwrap();

    let groups = ReportFileScanner::new(&path)
        .scan(&[PathBuf::from("/data")])
        .unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].size, Some(5));
    assert_eq!(
        groups[1].paths,
        vec![
            PathBuf::from("/data/b/two.txt"),
            PathBuf::from("/data/c/two.txt"),
            PathBuf::from("/data/a/two.txt"),
        ]
    );
}

#[test]
fn test_report_without_match_sets_has_no_groups() {
    assert!(parse_report(r#"{"jdupesVersion":"1.27.3"}"#).unwrap().is_empty());
    assert!(parse_report(r#"{"matchSets":[]}"#).unwrap().is_empty());
}

#[test]
fn test_match_set_without_file_list_is_empty_group() {
    let groups = parse_report(r#"{"matchSets":[{"fileSize":1}]}"#).unwrap();
    assert_eq!(groups.len(), 1);
    assert!(groups[0].is_empty());
}

#[test]
fn test_malformed_reports_rejected() {
    assert!(matches!(
        parse_report(""),
        Err(MalformedReportError::Json(_))
    ));
    assert!(matches!(
        parse_report(r#"{"matchSets":{}}"#),
        Err(MalformedReportError::Json(_))
    ));
    assert!(matches!(
        parse_report(r#"{"matchSets":[{"fileList":[{"name":"x"}]}]}"#),
        Err(MalformedReportError::Json(_))
    ));
    assert!(matches!(
        parse_report(r#"{"matchSets":[{"fileList":[{"filePath":"/a"},{"filePath":""}]}]}"#),
        Err(MalformedReportError::EmptyPath { set: 0, entry: 1 })
    ));
}

#[test]
fn test_malformed_saved_report_is_scan_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("truncated.json");
    fs::write(&path, r#"{"matchSets":[{"fileList":[{"filePath":"/a"}"#).unwrap();

    let err = ReportFileScanner::new(&path).scan(&[]).unwrap_err();
    assert!(matches!(err, ScanError::Malformed(_)));
    assert!(err.to_string().contains("malformed duplicate report"));
}

#[test]
fn test_non_ascii_paths_preserved() {
    let groups = parse_report(
        r#"{"matchSets":[{"fileList":[{"filePath":"/fotos/café.jpg"},{"filePath":"/backup/日本.jpg"}]}]}"#,
    )
    .unwrap();
    assert_eq!(groups[0].paths[0], PathBuf::from("/fotos/café.jpg"));
    assert_eq!(groups[0].paths[1], PathBuf::from("/backup/日本.jpg"));
}
