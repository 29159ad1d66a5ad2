//! Ingestion of the scanner's JSON duplicate report.
//!
//! # Input Schema
//!
//! The report is the document `jdupes --json` prints:
//!
//! ```json
//! {
//!   "jdupesVersion": "1.27.3",
//!   "matchSets": [
//!     {
//!       "fileSize": 1024,
//!       "fileList": [
//!         { "filePath": "/data/a/file.txt" },
//!         { "filePath": "/data/b/file.txt" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Only `matchSets[].fileList[].filePath` is required per entry. A missing
//! `matchSets` means no duplicates; unknown fields are ignored.
//!
//! # Example
//!
//! ```
//! use dupe_sidecar::duplicates::parse_report;
//!
//! let json = r#"{"matchSets":[{"fileSize":3,"fileList":[{"filePath":"/a"},{"filePath":"/b"}]}]}"#;
//! let groups = parse_report(json).unwrap();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].size, Some(3));
//! ```

use std::io::Read;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

use super::groups::DuplicateGroup;

/// The scanner report could not be trusted.
///
/// Always fatal: no group is resolved once the report is in doubt.
#[derive(Debug, Error)]
pub enum MalformedReportError {
    /// Not JSON, or JSON of the wrong shape
    #[error("malformed duplicate report: {0}")]
    Json(#[from] serde_json::Error),

    /// A file entry with an empty path
    #[error("malformed duplicate report: match set {set} entry {entry} has an empty filePath")]
    EmptyPath { set: usize, entry: usize },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JdupesReport {
    #[serde(default)]
    match_sets: Vec<MatchSet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchSet {
    #[serde(default)]
    file_size: Option<u64>,
    #[serde(default)]
    file_list: Vec<FileRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileRecord {
    file_path: String,
}

impl MatchSet {
    fn into_group(self, set: usize) -> Result<DuplicateGroup, MalformedReportError> {
        let paths = self
            .file_list
            .into_iter()
            .enumerate()
            .map(|(entry, record)| {
                if record.file_path.is_empty() {
                    Err(MalformedReportError::EmptyPath { set, entry })
                } else {
                    Ok(PathBuf::from(record.file_path))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DuplicateGroup {
            paths,
            size: self.file_size,
        })
    }
}

/// Parse a report held in memory.
///
/// # Errors
///
/// Returns [`MalformedReportError`] if the text is not a report.
pub fn parse_report(json: &str) -> Result<Vec<DuplicateGroup>, MalformedReportError> {
    let report: JdupesReport = serde_json::from_str(json)?;
    into_groups(report)
}

/// Parse a report from a reader (e.g. a saved report file).
///
/// # Errors
///
/// Returns [`MalformedReportError`] on read failure or if the content is not a report.
pub fn read_report<R: Read>(reader: R) -> Result<Vec<DuplicateGroup>, MalformedReportError> {
    let report: JdupesReport = serde_json::from_reader(reader)?;
    into_groups(report)
}

fn into_groups(report: JdupesReport) -> Result<Vec<DuplicateGroup>, MalformedReportError> {
    let groups = report
        .match_sets
        .into_iter()
        .enumerate()
        .map(|(set, match_set)| match_set.into_group(set))
        .collect::<Result<Vec<_>, _>>()?;
    log::debug!("Parsed {} duplicate sets from report", groups.len());
    Ok(groups)
}
