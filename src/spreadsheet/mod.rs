//! Spreadsheet reading and writing
//!
//! Reads booking exports into passenger records and renders the passenger
//! manifest workbook.

pub mod bookings;
pub mod manifest;
pub mod reader;

pub use bookings::{parse_booking_rows, ParsedSheet};
pub use manifest::render_manifest;
pub use reader::{read_first_sheet, SheetRow};
