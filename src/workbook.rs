//! Excel output: one sheet per scraped report table

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{ColNum, Format, RowNum, Workbook, Worksheet, XlsxError};
use tracing::{debug, info, warn};

use crate::errors::EdgarError;
use crate::models::ReportTable;

/// Excel's limit on sheet name length, in characters
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Excel's limit on the text in one cell, in characters
pub const MAX_CELL_LEN: usize = 32_767;

const ILLEGAL_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Remove characters Excel forbids in sheet names and cut to 31 characters.
pub fn sanitize_sheet_name(name: &str) -> String {
    name.chars()
        .filter(|c| !ILLEGAL_SHEET_CHARS.contains(c))
        .take(MAX_SHEET_NAME_LEN)
        .collect()
}

/// Hands out sheet names that are legal and unique within one workbook.
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: Vec<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_taken(&self, candidate: &str) -> bool {
        candidate.eq_ignore_ascii_case("history")
            || self.used.iter().any(|u| u.to_lowercase() == candidate.to_lowercase())
    }

    /// Sanitized form of `display_name`, suffixed with ` (n)` on collision.
    pub fn assign(&mut self, display_name: &str) -> String {
        let mut base = sanitize_sheet_name(display_name)
            .trim_matches('\'')
            .to_string();
        if base.trim().is_empty() {
            base = format!("Sheet{}", self.used.len() + 1);
        }

        let mut candidate = base.clone();
        let mut n = 2;
        while self.is_taken(&candidate) {
            let suffix = format!(" ({})", n);
            let keep = MAX_SHEET_NAME_LEN - suffix.chars().count();
            let stem: String = base.chars().take(keep).collect();
            let stem = stem.trim_end_matches(|c: char| c == '\'' || c.is_whitespace());
            candidate = format!("{}{}", stem, suffix);
            n += 1;
        }

        self.used.push(candidate.clone());
        candidate
    }
}

/// What ended up in the saved workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookSummary {
    pub path: PathBuf,
    pub sheets: Vec<String>,
    pub skipped: Vec<String>,
}

/// Builds a workbook in memory and saves it in one step.
///
/// Dropping the writer without calling [`ReportWorkbook::save`] leaves no file behind.
pub struct ReportWorkbook {
    workbook: Workbook,
    path: PathBuf,
    header: Format,
    namer: SheetNamer,
    sheets: Vec<String>,
    skipped: Vec<String>,
}

impl ReportWorkbook {
    /// Prepare a workbook at `output_dir/file_name`, creating the directory if needed.
    pub fn create(output_dir: &Path, file_name: &str) -> Result<Self, EdgarError> {
        std::fs::create_dir_all(output_dir)?;
        Ok(Self {
            workbook: Workbook::new(),
            path: output_dir.join(file_name),
            header: Format::new().set_bold(),
            namer: SheetNamer::new(),
            sheets: Vec::new(),
            skipped: Vec::new(),
        })
    }

    /// Add `table` as a sheet named after `display_name`. Empty tables are skipped.
    ///
    /// Returns the sheet name when a sheet was written.
    pub fn add_report(
        &mut self,
        display_name: &str,
        table: &ReportTable,
    ) -> Result<Option<String>, EdgarError> {
        if table.is_empty() {
            info!("Skipping empty table for sheet: {}", display_name);
            self.skipped.push(display_name.to_string());
            return Ok(None);
        }

        let sheet_name = self.namer.assign(display_name);
        let mut worksheet = Worksheet::new();
        worksheet.set_name(&sheet_name)?;
        write_grid(&mut worksheet, table, &self.header)?;
        self.workbook.push_worksheet(worksheet);

        debug!("Wrote sheet '{}' with {} rows", sheet_name, table.rows.len());
        self.sheets.push(sheet_name.clone());
        Ok(Some(sheet_name))
    }

    /// Write the file to disk.
    pub fn save(mut self) -> Result<WorkbookSummary, EdgarError> {
        self.workbook.save(&self.path)?;
        info!("Saved workbook {} ({} sheets)", self.path.display(), self.sheets.len());
        Ok(WorkbookSummary {
            path: self.path,
            sheets: self.sheets,
            skipped: self.skipped,
        })
    }
}

/// Cut text that would not fit in one Excel cell.
fn fit_cell(value: &str) -> Cow<'_, str> {
    match value.char_indices().nth(MAX_CELL_LEN) {
        Some((cut, _)) => {
            warn!(
                "Cell text of {} characters truncated to {}",
                value.chars().count(),
                MAX_CELL_LEN
            );
            Cow::Owned(value[..cut].to_string())
        }
        None => Cow::Borrowed(value),
    }
}

fn write_row(
    worksheet: &mut Worksheet,
    row_num: RowNum,
    row: &[String],
    format: Option<&Format>,
) -> Result<(), XlsxError> {
    for (c, value) in row.iter().enumerate() {
        if value.is_empty() {
            continue;
        }
        let col_num = ColNum::try_from(c).map_err(|_| XlsxError::RowColumnLimitError)?;
        let text = fit_cell(value);
        match format {
            Some(format) => worksheet.write_string_with_format(row_num, col_num, text, format)?,
            None => worksheet.write_string(row_num, col_num, text)?,
        };
    }
    Ok(())
}

/// First row in bold as the header, the rest as plain text. Blank cells are left empty.
fn write_grid(
    worksheet: &mut Worksheet,
    table: &ReportTable,
    header: &Format,
) -> Result<(), XlsxError> {
    let Some(header_row) = table.header() else {
        return Ok(());
    };
    write_row(worksheet, 0, header_row, Some(header))?;

    for (r, row) in table.rows.iter().enumerate().skip(1) {
        let row_num = RowNum::try_from(r).map_err(|_| XlsxError::RowColumnLimitError)?;
        write_row(worksheet, row_num, row, None)?;
    }
    Ok(())
}

/// Write every report in order into `output_dir/file_name`.
pub fn write_reports(
    output_dir: &Path,
    file_name: &str,
    reports: &[(String, ReportTable)],
) -> Result<WorkbookSummary, EdgarError> {
    let mut workbook = ReportWorkbook::create(output_dir, file_name)?;
    for (name, table) in reports {
        workbook.add_report(name, table)?;
    }
    workbook.save()
}
