//! Spreadsheet report generation
//!
//! The workbook has an `index` sheet listing every category (sorted), then
//! one sheet per category with the columns `posted`, `title`, `company` and
//! `url`. A leading `buzz` column marked `x` is added to a category sheet
//! only if one of its records is buzz-tagged.

use crate::classify::{any_buzz, ClassifiedRecord, FilteredView};
use crate::output::error::{OutputError, OutputResult};
use crate::output::sheet_name::SheetNamer;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::{Path, PathBuf};

/// Name of the first sheet
pub const INDEX_SHEET: &str = "index";

/// Header of the single index sheet column
pub const INDEX_HEADER: &str = "category";

/// Columns written for every category sheet
pub const REPORT_COLUMNS: [&str; 4] = ["posted", "title", "company", "url"];

pub const BUZZ_HEADER: &str = "buzz";

/// Cell value for a buzz-tagged record
pub const BUZZ_MARKER: &str = "x";

/// Derives the report file name from the refresh timestamp
///
/// `reports/jobs.xlsx` with refresh `2024-05-01T120000` becomes
/// `reports/2024-05-01T120000_jobs.xlsx`. Without a timestamp the configured
/// path is used as is.
pub fn report_file_path(report_path: &Path, last_refresh: Option<&str>) -> OutputResult<PathBuf> {
    let file_name = report_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| OutputError::InvalidPath(report_path.display().to_string()))?;

    let file_name = match last_refresh {
        Some(stamp) if !stamp.is_empty() => format!("{}_{}", stamp, file_name),
        _ => file_name.to_string(),
    };

    Ok(report_path.with_file_name(file_name))
}

/// Writes the filtered view as a multi-sheet workbook
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written workbook
/// * `Err(OutputError)` - The workbook could not be built or saved
pub fn write_report(view: &FilteredView, report_path: &Path) -> OutputResult<PathBuf> {
    let path = report_file_path(report_path, view.last_refresh())?;
    let mut workbook = build_workbook(view)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    workbook.save(&path)?;

    tracing::info!(
        "Report written to {} ({} jobs in {} categories)",
        path.display(),
        view.len(),
        view.categories().len()
    );
    Ok(path)
}

/// Builds the workbook in memory
pub fn build_workbook(view: &FilteredView) -> OutputResult<Workbook> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let groups = view.by_category();

    let mut namer = SheetNamer::new();
    namer.reserve(INDEX_SHEET);

    let index = workbook.add_worksheet();
    index.set_name(INDEX_SHEET)?;
    index.write_string_with_format(0, 0, INDEX_HEADER, &bold)?;
    for (row, category) in groups.keys().enumerate() {
        index.write_string(row as u32 + 1, 0, *category)?;
    }
    index.autofit();

    for (category, records) in &groups {
        let name = namer.claim(category);
        tracing::debug!("Sheet '{}' for category '{}': {} jobs", name, category, records.len());

        let sheet = workbook.add_worksheet();
        sheet.set_name(&name)?;
        write_category_sheet(sheet, records, &bold)?;
    }

    Ok(workbook)
}

fn write_category_sheet(
    sheet: &mut Worksheet,
    records: &[&ClassifiedRecord],
    bold: &Format,
) -> OutputResult<()> {
    let with_buzz = any_buzz(records);
    let mut headers: Vec<&str> = Vec::with_capacity(REPORT_COLUMNS.len() + 1);
    if with_buzz {
        headers.push(BUZZ_HEADER);
    }
    headers.extend(REPORT_COLUMNS);

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, bold)?;
    }

    for (index, classified) in records.iter().enumerate() {
        let row = index as u32 + 1;
        let record = &classified.record;
        let mut col = 0u16;

        if with_buzz {
            if classified.buzz {
                sheet.write_string(row, col, BUZZ_MARKER)?;
            }
            col += 1;
        }

        for value in [&record.posted, &record.title, &record.company, &record.url] {
            if !value.is_empty() {
                sheet.write_string(row, col, value)?;
            }
            col += 1;
        }
    }

    sheet.autofit();
    Ok(())
}
