//! Passenger manifest export

use std::collections::BTreeMap;

use rust_xlsxwriter::{Format, Workbook};

use crate::{error::AppResult, models::passenger_record::PassengerRecord};

pub const MANIFEST_COLUMNS: [&str; 6] = [
    "Date",
    "Surname",
    "First name",
    "Pax",
    "Checked in",
    "Checked in by",
];

const MANIFEST_DATE_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Render records grouped by tour type into a single-sheet workbook.
///
/// Each group gets a bold merged title with its total pax, a header row, one
/// row per passenger and a blank separator row.
pub fn render_manifest(records: &[PassengerRecord]) -> AppResult<Vec<u8>> {
    let mut groups: BTreeMap<&str, Vec<&PassengerRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.tour_type.as_str()).or_default().push(record);
    }

    let bold = Format::new().set_bold();
    let last_col = (MANIFEST_COLUMNS.len() - 1) as u16;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Passengers")?;
    sheet.set_column_width(0, 18)?;
    sheet.set_column_width(1, 20)?;
    sheet.set_column_width(2, 20)?;
    sheet.set_column_width(5, 20)?;

    let mut row: u32 = 0;
    for (tour_type, mut members) in groups {
        members.sort_by_key(|record| record.tour_date);
        let total_pax: i64 = members.iter().map(|record| record.pax as i64).sum();
        let label = if tour_type.is_empty() { "(no tour type)" } else { tour_type };

        sheet.merge_range(
            row,
            0,
            row,
            last_col,
            &format!("{} (Total pax: {})", label, total_pax),
            &bold,
        )?;
        row += 1;

        for (col, title) in MANIFEST_COLUMNS.iter().enumerate() {
            sheet.write_string_with_format(row, col as u16, *title, &bold)?;
        }
        row += 1;

        for record in members {
            sheet.write_string(row, 0, record.tour_date.format(MANIFEST_DATE_FORMAT).to_string())?;
            sheet.write_string(row, 1, record.surname.as_deref().unwrap_or(""))?;
            sheet.write_string(row, 2, record.first_name.as_deref().unwrap_or(""))?;
            sheet.write_number(row, 3, record.pax)?;
            sheet.write_string(row, 4, if record.check_in.is_checked_in() { "Yes" } else { "No" })?;
            if let Some(by) = record.check_in.attributor() {
                sheet.write_string(row, 5, by)?;
            }
            row += 1;
        }

        // separator
        row += 1;
    }

    Ok(workbook.save_to_buffer()?)
}
