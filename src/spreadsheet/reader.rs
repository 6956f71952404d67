//! Workbook reader
//!
//! Opens an uploaded `.xlsx`/`.xls`/`.ods` file and flattens its first
//! worksheet into text rows, keeping worksheet row numbers for error
//! reporting.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};

use crate::error::{AppError, AppResult};

/// Format used to render native date cells as text
pub const NATIVE_DATE_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// One used worksheet row with its cells rendered as text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
    /// 1-based worksheet row number
    pub number: u32,
    /// Cells from column A onwards
    pub cells: Vec<String>,
    /// 1-based columns holding spreadsheet error values (#N/A, #REF!, ...)
    pub error_cells: Vec<usize>,
}

impl SheetRow {
    pub fn new(number: u32, cells: &[&str]) -> Self {
        SheetRow {
            number,
            cells: cells.iter().map(|c| c.to_string()).collect(),
            error_cells: Vec::new(),
        }
    }

    /// Text of a 1-based column, empty when the row is shorter
    pub fn cell(&self, column: usize) -> &str {
        column
            .checked_sub(1)
            .and_then(|idx| self.cells.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn has_error(&self, column: usize) -> bool {
        self.error_cells.contains(&column)
    }
}

/// Read the used rows of the first worksheet.
///
/// Rows where every cell is empty are dropped, like a "rows used" view of the
/// sheet. A cell holding only whitespace still counts as used.
pub fn read_first_sheet(bytes: Vec<u8>) -> AppResult<Vec<SheetRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::Spreadsheet("No worksheet found in the Excel file.".to_string()))??;

    let (first_row, first_col) = match range.start() {
        Some(start) => start,
        None => return Ok(Vec::new()),
    };

    let rows = range
        .rows()
        .enumerate()
        .filter(|(_, cells)| is_used(cells))
        .map(|(offset, cells)| {
            let mut row = SheetRow {
                number: first_row + offset as u32 + 1,
                cells: vec![String::new(); first_col as usize],
                error_cells: Vec::new(),
            };
            for cell in cells {
                if matches!(cell, Data::Error(_)) {
                    row.error_cells.push(row.cells.len() + 1);
                }
                row.cells.push(cell_text(cell));
            }
            row
        })
        .collect();

    Ok(rows)
}

fn is_used(cells: &[Data]) -> bool {
    cells.iter().any(|cell| !matches!(cell, Data::Empty))
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        // Whole numbers come back as floats from xlsx
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|naive| naive.format(NATIVE_DATE_FORMAT).to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::Error(e) => e.to_string(),
    }
}
