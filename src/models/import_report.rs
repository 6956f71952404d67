//! Spreadsheet import report.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Summary returned after an import. Row-level failures are reported here and
/// never fail the request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub message: String,
    /// Data rows scanned (header excluded, blank-date rows included)
    pub total_rows_processed: usize,
    pub rows_imported: usize,
    /// Active records moved to the archive before the import
    pub archived_records: u64,
    pub errors: Vec<String>,
}
