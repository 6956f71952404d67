//! Booking sheet translator
//!
//! Turns worksheet rows into passenger records. The first row is the header;
//! every other row is translated independently so that one bad row never
//! stops the rest of the sheet.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::reader::SheetRow;
use crate::models::passenger_record::NewPassengerRecord;

/// Accepted tour date layouts, tried in order
pub const TOUR_DATE_FORMATS: [&str; 5] = [
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// 1-based column positions of the booking export
pub mod columns {
    pub const TOUR_DATE: usize = 2;
    pub const TOUR_TYPE: usize = 3;
    pub const SEATS: usize = 4;
    pub const SURNAME: usize = 5;
    pub const FIRST_NAME: usize = 6;
    pub const PAX: usize = 7;
    pub const EMAIL: usize = 8;
    pub const UNIQUE_REFERENCE: usize = 9;
    pub const PHONE: usize = 11;
    pub const NOTES: usize = 12;

    /// Columns a row cannot be imported without. Error values elsewhere are
    /// kept as their text.
    pub const REQUIRED: [usize; 1] = [TOUR_DATE];
}

/// Outcome of translating a whole sheet
#[derive(Debug, Default)]
pub struct ParsedSheet {
    /// Data rows scanned, header excluded
    pub total_rows: usize,
    pub records: Vec<NewPassengerRecord>,
    /// One message per failed row, prefixed with the worksheet row number
    pub errors: Vec<String>,
}

/// Translate every data row of a sheet (the first row is a header)
pub fn parse_booking_rows(rows: &[SheetRow]) -> ParsedSheet {
    let mut parsed = ParsedSheet::default();

    for row in rows.iter().skip(1) {
        parsed.total_rows += 1;
        match translate_row(row) {
            Ok(Some(record)) => parsed.records.push(record),
            Ok(None) => {}
            Err(message) => parsed.errors.push(format!("Row {}: {}", row.number, message)),
        }
    }

    parsed
}

/// Translate one row. `Ok(None)` means the row has no tour date and is skipped.
fn translate_row(row: &SheetRow) -> Result<Option<NewPassengerRecord>, String> {
    let raw_date = row.cell(columns::TOUR_DATE).trim();
    if raw_date.is_empty() {
        return Ok(None);
    }

    if let Some(column) = columns::REQUIRED.iter().copied().find(|c| row.has_error(*c)) {
        return Err(format!(
            "Exception: cell in column {} holds the error value '{}'.",
            column,
            row.cell(column)
        ));
    }

    let tour_date = parse_tour_date(raw_date)
        .ok_or_else(|| format!("Invalid Tour Date: '{}'.", raw_date))?;

    Ok(Some(NewPassengerRecord {
        tour_date,
        tour_type: row.cell(columns::TOUR_TYPE).trim().to_string(),
        seats: optional_text(row, columns::SEATS),
        surname: optional_text(row, columns::SURNAME),
        first_name: optional_text(row, columns::FIRST_NAME),
        pax: parse_pax(row.cell(columns::PAX)),
        notes: optional_text(row, columns::NOTES),
        email_address: optional_text(row, columns::EMAIL),
        unique_reference: optional_text(row, columns::UNIQUE_REFERENCE),
        phone_number: optional_text(row, columns::PHONE),
    }))
}

/// Parse a tour date with the first matching layout, read as UTC
pub fn parse_tour_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    TOUR_DATE_FORMATS
        .iter()
        .find_map(|format| {
            NaiveDateTime::parse_from_str(value, format).ok().or_else(|| {
                NaiveDate::parse_from_str(value, format)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
        })
        .map(|naive| naive.and_utc())
}

/// Non-numeric or negative party sizes count as zero
pub fn parse_pax(value: &str) -> i32 {
    value.trim().parse::<i32>().map(|pax| pax.max(0)).unwrap_or(0)
}

fn optional_text(row: &SheetRow, column: usize) -> Option<String> {
    let text = row.cell(column).trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const HEADER: [&str; 12] = [
        "Booking", "Tour date", "Tour type", "Seats", "Surname", "First name", "Pax",
        "E-mail address", "Unique reference", "Other reference", "Phone number", "Notes",
    ];

    fn booking(number: u32, date: &str, tour_type: &str, pax: &str) -> SheetRow {
        SheetRow::new(
            number,
            &[
                "B1", date, tour_type, "12A", "Murphy", "Sean", pax, "sean@example.com",
                "GYG-100", "", "+353 1 555", "Window seat",
            ],
        )
    }

    #[test]
    fn test_blank_date_row_is_skipped_without_error() {
        let rows = vec![
            SheetRow::new(1, &HEADER),
            booking(2, "16.04.2025 10:00:00", "Dublin", "4"),
            booking(3, "   ", "Dublin", "2"),
        ];

        let parsed = parse_booking_rows(&rows);
        assert_eq!(parsed.total_rows, 2);
        assert_eq!(parsed.records.len(), 1);
        assert!(parsed.errors.is_empty());

        let record = &parsed.records[0];
        assert_eq!(record.tour_type, "Dublin");
        assert_eq!(record.pax, 4);
        assert_eq!(record.seats.as_deref(), Some("12A"));
        assert_eq!(record.unique_reference.as_deref(), Some("GYG-100"));
        assert_eq!(record.phone_number.as_deref(), Some("+353 1 555"));
        assert_eq!(record.notes.as_deref(), Some("Window seat"));
    }

    #[test]
    fn test_invalid_date_reports_row_number_and_value() {
        let rows = vec![
            SheetRow::new(1, &HEADER),
            booking(2, "next tuesday", "Cliffs", "2"),
            booking(3, "17.04.2025", "Cliffs", "3"),
        ];

        let parsed = parse_booking_rows(&rows);
        assert_eq!(parsed.total_rows, 2);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.errors, vec!["Row 2: Invalid Tour Date: 'next tuesday'.".to_string()]);
    }

    #[test]
    fn test_error_cell_in_date_fails_only_its_row() {
        let mut broken = booking(2, "16.04.2025", "Cliffs", "2");
        broken.cells[columns::TOUR_DATE - 1] = "#N/A".to_string();
        broken.error_cells.push(columns::TOUR_DATE);
        let rows = vec![SheetRow::new(1, &HEADER), broken, booking(3, "16.04.2025", "Cliffs", "1")];

        let parsed = parse_booking_rows(&rows);
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].starts_with("Row 2: Exception:"));
        assert!(parsed.errors[0].contains("#N/A"));
    }

    #[test]
    fn test_blank_date_row_with_error_cell_is_skipped() {
        let mut row = booking(2, "", "Cliffs", "2");
        row.cells[columns::NOTES - 1] = "#N/A".to_string();
        row.error_cells.push(columns::NOTES);

        let parsed = parse_booking_rows(&[SheetRow::new(1, &HEADER), row]);
        assert_eq!(parsed.total_rows, 1);
        assert!(parsed.records.is_empty());
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_error_values_in_optional_columns_are_kept_as_text() {
        let mut row = booking(2, "16.04.2025", "Cliffs", "#VALUE!");
        row.error_cells.push(columns::PAX);
        row.cells[columns::EMAIL - 1] = "#REF!".to_string();
        row.error_cells.push(columns::EMAIL);

        let parsed = parse_booking_rows(&[SheetRow::new(1, &HEADER), row]);
        assert!(parsed.errors.is_empty());
        let record = &parsed.records[0];
        assert_eq!(record.pax, 0);
        assert_eq!(record.email_address.as_deref(), Some("#REF!"));
    }

    #[test]
    fn test_date_formats_in_order() {
        let dotted = parse_tour_date("03.04.2025 09:30:00").unwrap();
        assert_eq!((dotted.day(), dotted.month(), dotted.hour()), (3, 4, 9));

        let dotted_day = parse_tour_date("03.04.2025").unwrap();
        assert_eq!((dotted_day.day(), dotted_day.month(), dotted_day.hour()), (3, 4, 0));

        let us = parse_tour_date("04/03/2025 14:00:00").unwrap();
        assert_eq!((us.day(), us.month(), us.hour()), (3, 4, 14));

        let us_day = parse_tour_date("04/03/2025").unwrap();
        assert_eq!((us_day.day(), us_day.month()), (3, 4));

        let iso = parse_tour_date("2025-04-03T08:15:00").unwrap();
        assert_eq!((iso.day(), iso.hour(), iso.minute()), (3, 8, 15));

        assert!(parse_tour_date("2025/04/03").is_none());
    }

    #[test]
    fn test_pax_is_permissive() {
        assert_eq!(parse_pax("3"), 3);
        assert_eq!(parse_pax(" 5 "), 5);
        assert_eq!(parse_pax("two"), 0);
        assert_eq!(parse_pax(""), 0);
        assert_eq!(parse_pax("-2"), 0);
    }

    #[test]
    fn test_short_rows_leave_missing_columns_empty() {
        let rows = vec![
            SheetRow::new(1, &HEADER),
            SheetRow::new(5, &["", "01.05.2025", "Howth", "", "Kelly"]),
        ];

        let parsed = parse_booking_rows(&rows);
        let record = &parsed.records[0];
        assert_eq!(record.surname.as_deref(), Some("Kelly"));
        assert_eq!(record.pax, 0);
        assert!(record.email_address.is_none());
        assert!(record.notes.is_none());
    }

    #[test]
    fn test_header_only_sheet() {
        let parsed = parse_booking_rows(&[SheetRow::new(1, &HEADER)]);
        assert_eq!(parsed.total_rows, 0);
        assert!(parsed.records.is_empty());
    }
}
