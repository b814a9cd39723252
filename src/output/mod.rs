//! Output module for reports and dataset summaries
//!
//! This module handles:
//! - Writing the categorized spreadsheet report
//! - Sanitizing and deduplicating worksheet names
//! - Summarizing the dataset for `--stats`

mod error;
pub mod report;
mod sheet_name;
pub mod stats;

pub use error::{OutputError, OutputResult};
pub use report::{build_workbook, report_file_path, write_report};
pub use sheet_name::{sanitize_sheet_name, SheetNamer, MAX_SHEET_NAME_LEN};
pub use stats::{print_statistics, DatasetStatistics};
