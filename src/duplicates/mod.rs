//! Duplicate group handling.
//!
//! This module provides functionality for:
//! - Ingesting the scanner's JSON report into [`DuplicateGroup`]s
//! - Ordering each group by directory priority into an [`OrderedGroup`]

pub mod groups;
pub mod priority;
pub mod report;

pub use groups::{DuplicateGroup, OrderedGroup};
pub use priority::{order_paths, PriorityOrder};
pub use report::{parse_report, read_report, MalformedReportError};
