//! Spreadsheet import/export for the locker table.
//!
//! Reading goes through `calamine` (both `.xlsx` and legacy `.xls`), writing
//! through `rust_xlsxwriter` (`.xlsx` only). The sheet layout is one header row
//! followed by one row per locker.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDateTime, NaiveTime};
use rust_xlsxwriter::{Format, FormatBorder, Workbook, XlsxError};

use crate::lockers::LockerAssignment;
use crate::types::LockerNo;

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Worksheet name used for exports.
pub const SHEET_NAME: &str = "Lockers";

/// Header of the locker number column.
pub const LOCKER_NO_COLUMN: &str = "locker_no";

/// Headers of the assignment columns, in [`LockerAssignment::values`] order.
pub const ASSIGNMENT_COLUMNS: [&str; 8] = [
    "gc_no",
    "emp_no",
    "name",
    "designation",
    "department",
    "gender",
    "from_date",
    "to_date",
];

/// Header of the occupancy column (export only, ignored on import).
pub const IS_EMPTY_COLUMN: &str = "is_empty";

/// Columns an import must contain, in the order they are reported when missing.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    LOCKER_NO_COLUMN,
    "gc_no",
    "emp_no",
    "name",
    "designation",
    "department",
    "gender",
    "from_date",
    "to_date",
];

/// MIME type of `.xlsx` downloads.
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// File extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["xlsx", "xls"];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SpreadsheetError {
    #[error("Could not read spreadsheet: {0}")]
    Read(#[from] calamine::Error),

    #[error("Spreadsheet contains no worksheets")]
    NoWorksheet,

    #[error("Missing columns: {}", .0.join(", "))]
    MissingColumns(Vec<&'static str>),

    #[error("Row {row}: invalid locker_no '{value}'")]
    InvalidLockerNo { row: u32, value: String },

    #[error("Could not write spreadsheet: {0}")]
    Write(#[from] XlsxError),
}

/// One data row of a locker sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    pub locker_no: LockerNo,
    pub assignment: LockerAssignment,
}

/// Result of reading an uploaded sheet.
#[derive(Debug, Default)]
pub struct ParsedSheet {
    /// Rows with a locker number, in sheet order. Numbers are not range-checked.
    pub rows: Vec<SheetRow>,
    /// Rows dropped because their `locker_no` cell was blank.
    pub blank_rows: usize,
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Check the extension of an uploaded file name against [`ALLOWED_EXTENSIONS`].
pub fn is_allowed_upload(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Parse the first worksheet of an `.xlsx`/`.xls` file.
///
/// The first row is the header. All [`REQUIRED_COLUMNS`] must be present;
/// order does not matter and extra columns are ignored. Empty and error cells
/// become empty strings.
pub fn read_workbook(bytes: &[u8]) -> Result<ParsedSheet, SpreadsheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoWorksheet)??;

    let first_row = range.start().map_or(0, |(row, _)| row);
    let mut rows = range.rows();

    let header: HashMap<String, usize> = match rows.next() {
        Some(cells) => cells
            .iter()
            .enumerate()
            .rev()
            .map(|(idx, cell)| (cell_text(Some(cell)).trim().to_string(), idx))
            .collect(),
        None => HashMap::new(),
    };

    let missing: Vec<&'static str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| !header.contains_key(*col))
        .collect();
    if !missing.is_empty() {
        return Err(SpreadsheetError::MissingColumns(missing));
    }

    let locker_no_idx = header[LOCKER_NO_COLUMN];
    let field_idx = ASSIGNMENT_COLUMNS.map(|col| header[col]);

    let mut parsed = ParsedSheet::default();
    for (offset, cells) in rows.enumerate() {
        // Header is sheet row `first_row + 1` (1-based); data starts below it.
        let sheet_row = first_row + offset as u32 + 2;

        let locker_no = match parse_locker_no(cells.get(locker_no_idx)) {
            Ok(Some(n)) => n,
            Ok(None) => {
                parsed.blank_rows += 1;
                continue;
            }
            Err(value) => {
                return Err(SpreadsheetError::InvalidLockerNo {
                    row: sheet_row,
                    value,
                })
            }
        };

        let [gc_no, emp_no, name, designation, department, gender, from_date, to_date] =
            field_idx.map(|idx| Some(cell_text(cells.get(idx))));

        parsed.rows.push(SheetRow {
            locker_no,
            assignment: LockerAssignment {
                gc_no,
                emp_no,
                name,
                designation,
                department,
                gender,
                from_date,
                to_date,
            },
        });
    }

    Ok(parsed)
}

/// Render a cell as the text stored in the database.
fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) | Some(Data::Error(_)) => String::new(),
        Some(Data::String(s)) => s.clone(),
        Some(Data::Int(i)) => i.to_string(),
        // `f64` display already drops a trailing `.0`.
        Some(Data::Float(f)) => f.to_string(),
        Some(Data::DateTime(dt)) => match dt.as_datetime() {
            Some(value) => format_datetime(value),
            None => dt.as_f64().to_string(),
        },
        Some(other) => other.to_string(),
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    if value.time() == NaiveTime::MIN {
        value.format("%Y-%m-%d").to_string()
    } else {
        value.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Parse a `locker_no` cell. `Ok(None)` for blanks, `Err(text)` for anything
/// that is not a whole number.
fn parse_locker_no(cell: Option<&Data>) -> Result<Option<LockerNo>, String> {
    match cell {
        None | Some(Data::Empty) => Ok(None),
        Some(Data::Int(i)) => Ok(Some(*i)),
        Some(Data::Float(f)) => whole_number(*f).map(Some).ok_or_else(|| f.to_string()),
        Some(Data::String(s)) => {
            let text = s.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<LockerNo>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(whole_number))
                .map(Some)
                .ok_or_else(|| text.to_string())
        }
        Some(other) => Err(other.to_string()),
    }
}

fn whole_number(value: f64) -> Option<LockerNo> {
    (value.is_finite() && value.fract() == 0.0).then_some(value as LockerNo)
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write rows to an in-memory `.xlsx` workbook.
///
/// `locker_no` and `is_empty` are numeric cells; blank assignment fields are
/// left as empty cells so they read back as empty strings.
pub fn write_workbook(rows: &[SheetRow]) -> Result<Vec<u8>, SpreadsheetError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);

    let headers: Vec<&str> = std::iter::once(LOCKER_NO_COLUMN)
        .chain(ASSIGNMENT_COLUMNS)
        .chain(std::iter::once(IS_EMPTY_COLUMN))
        .collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    let is_empty_col = (headers.len() - 1) as u16;
    for (idx, row) in rows.iter().enumerate() {
        let sheet_row = (idx + 1) as u32;

        worksheet.write_number(sheet_row, 0, row.locker_no as f64)?;
        widths[0] = widths[0].max(row.locker_no.to_string().len());

        for (field, value) in row.assignment.values().into_iter().enumerate() {
            let Some(text) = value.filter(|v| !v.is_empty()) else {
                continue;
            };
            let col = field + 1;
            worksheet.write_string(sheet_row, col as u16, text)?;
            widths[col] = widths[col].max(text.chars().count());
        }

        let empty_flag = if row.assignment.is_empty() { 1.0 } else { 0.0 };
        worksheet.write_number(sheet_row, is_empty_col, empty_flag)?;
    }

    for (col, width) in widths.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width as f64 + 2.0)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Download name for an export taken at `now` (local time).
pub fn export_filename(now: NaiveDateTime) -> String {
    format!("lockers_export_{}.xlsx", now.format("%Y%m%d_%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;
    use rust_xlsxwriter::ExcelDateTime;

    fn assigned(locker_no: LockerNo, name: &str) -> SheetRow {
        SheetRow {
            locker_no,
            assignment: LockerAssignment {
                gc_no: Some(format!("GC-{locker_no}")),
                emp_no: Some("000123".into()),
                name: Some(name.into()),
                designation: Some("Technician".into()),
                department: Some("Maintenance".into()),
                gender: Some("F".into()),
                from_date: Some("2024-01-05".into()),
                to_date: Some("2024-12-31".into()),
            },
        }
    }

    /// Build a workbook with the given header and string rows.
    fn sheet_with(header: &[&str], rows: &[Vec<&str>]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, h) in header.iter().enumerate() {
            worksheet.write_string(0, col as u16, *h).unwrap();
        }
        for (r, row) in rows.iter().enumerate() {
            for (col, value) in row.iter().enumerate() {
                if !value.is_empty() {
                    worksheet
                        .write_string((r + 1) as u32, col as u16, *value)
                        .unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn upload_extensions() {
        assert!(is_allowed_upload("lockers.xlsx"));
        assert!(is_allowed_upload("LOCKERS.XLS"));
        assert!(is_allowed_upload("march.backup.xlsx"));
        assert!(!is_allowed_upload("lockers.csv"));
        assert!(!is_allowed_upload("xlsx"));
        assert!(!is_allowed_upload(""));
    }

    #[test]
    fn exported_rows_read_back_unchanged() {
        let vacant = SheetRow {
            locker_no: 2,
            assignment: LockerAssignment::default(),
        };
        let rows = vec![assigned(1, "Asha Rao"), vacant, assigned(3, "Vikram")];

        let bytes = write_workbook(&rows).unwrap();
        let parsed = read_workbook(&bytes).unwrap();

        assert_eq!(parsed.blank_rows, 0);
        assert_eq!(parsed.rows.len(), 3);
        assert_eq!(parsed.rows[0], rows[0]);
        assert_eq!(parsed.rows[2], rows[2]);

        // Null fields come back as empty strings.
        assert_eq!(parsed.rows[1].locker_no, 2);
        assert_eq!(parsed.rows[1].assignment, LockerAssignment::default().filled());
    }

    #[test]
    fn columns_may_appear_in_any_order() {
        let header = [
            "name", "locker_no", "to_date", "from_date", "gender", "department",
            "designation", "emp_no", "gc_no", "notes",
        ];
        let bytes = sheet_with(
            &header,
            &[vec!["Kiran", "42", "", "2024-02-01", "M", "QA", "", "E9", "G9", "x"]],
        );

        let parsed = read_workbook(&bytes).unwrap();
        let row = &parsed.rows[0];
        assert_eq!(row.locker_no, 42);
        assert_eq!(row.assignment.name.as_deref(), Some("Kiran"));
        assert_eq!(row.assignment.gc_no.as_deref(), Some("G9"));
        assert_eq!(row.assignment.to_date.as_deref(), Some(""));
    }

    #[test]
    fn missing_columns_are_reported_in_canonical_order() {
        let bytes = sheet_with(&["locker_no", "name", "emp_no"], &[]);

        let err = read_workbook(&bytes).unwrap_err();
        assert_matches!(&err, SpreadsheetError::MissingColumns(cols) if cols.len() == 6);
        assert_eq!(
            err.to_string(),
            "Missing columns: gc_no, designation, department, gender, from_date, to_date"
        );
    }

    #[test]
    fn blank_locker_numbers_are_counted_not_imported() {
        let bytes = sheet_with(
            &REQUIRED_COLUMNS,
            &[
                vec!["7", "", "", "Dev"],
                vec!["", "", "", "Orphan"],
                vec!["500", "", "", "Out of range"],
            ],
        );

        let parsed = read_workbook(&bytes).unwrap();
        assert_eq!(parsed.blank_rows, 1);
        let numbers: Vec<_> = parsed.rows.iter().map(|r| r.locker_no).collect();
        assert_eq!(numbers, vec![7, 500]);
    }

    #[test]
    fn non_numeric_locker_number_fails_the_sheet() {
        let bytes = sheet_with(&REQUIRED_COLUMNS, &[vec!["1"], vec!["A-12"]]);

        let err = read_workbook(&bytes).unwrap_err();
        assert_matches!(err, SpreadsheetError::InvalidLockerNo { row: 3, ref value } if value == "A-12");
    }

    #[test]
    fn numeric_and_date_cells_become_text() {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, h) in REQUIRED_COLUMNS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *h).unwrap();
        }
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let from = ExcelDateTime::from_ymd(2024, 3, 15).unwrap();
        worksheet.write_number(1, 0, 12.0).unwrap();
        worksheet.write_number(1, 2, 4521.0).unwrap();
        worksheet.write_string(1, 3, "Latha").unwrap();
        worksheet
            .write_datetime_with_format(1, 7, &from, &date_format)
            .unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let parsed = read_workbook(&bytes).unwrap();
        let row = &parsed.rows[0];
        assert_eq!(row.locker_no, 12);
        assert_eq!(row.assignment.emp_no.as_deref(), Some("4521"));
        assert_eq!(row.assignment.from_date.as_deref(), Some("2024-03-15"));
    }

    #[test]
    fn garbage_bytes_are_a_read_error() {
        let err = read_workbook(b"definitely not a spreadsheet").unwrap_err();
        assert_matches!(err, SpreadsheetError::Read(_));
    }

    #[test]
    fn export_filename_is_timestamped() {
        let at = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(9, 5, 7)
            .unwrap();
        assert_eq!(export_filename(at), "lockers_export_20261016_090507.xlsx");
    }
}
