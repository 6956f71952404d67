//! Archived passenger records, displaced by a spreadsheet import

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::passenger_record::{CheckInColumns, CheckInStatus};

#[derive(Debug, Clone, FromRow)]
pub struct ArchivePassengerRecordRow {
    id: i32,
    archived_at: DateTime<Utc>,
    tour_date: DateTime<Utc>,
    tour_type: String,
    seats: Option<String>,
    surname: Option<String>,
    first_name: Option<String>,
    pax: i32,
    original_pax: i32,
    notes: Option<String>,
    email_address: Option<String>,
    unique_reference: Option<String>,
    phone_number: Option<String>,
    checked_in: bool,
    checked_in_by: Option<String>,
}

impl From<ArchivePassengerRecordRow> for ArchivePassengerRecord {
    fn from(row: ArchivePassengerRecordRow) -> Self {
        ArchivePassengerRecord {
            id: row.id,
            archived_at: row.archived_at,
            tour_date: row.tour_date,
            tour_type: row.tour_type,
            seats: row.seats,
            surname: row.surname,
            first_name: row.first_name,
            pax: row.pax,
            original_pax: row.original_pax,
            notes: row.notes,
            email_address: row.email_address,
            unique_reference: row.unique_reference,
            phone_number: row.phone_number,
            check_in: CheckInColumns {
                checked_in: row.checked_in,
                checked_in_by: row.checked_in_by,
            }
            .into(),
        }
    }
}

/// Immutable copy of a passenger record at the moment it was archived
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArchivePassengerRecord {
    pub id: i32,
    pub archived_at: DateTime<Utc>,
    pub tour_date: DateTime<Utc>,
    pub tour_type: String,
    pub seats: Option<String>,
    pub surname: Option<String>,
    pub first_name: Option<String>,
    pub pax: i32,
    pub original_pax: i32,
    pub notes: Option<String>,
    pub email_address: Option<String>,
    pub unique_reference: Option<String>,
    pub phone_number: Option<String>,
    #[serde(flatten)]
    pub check_in: CheckInStatus,
}

/// Query parameters for the archive
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveQuery {
    /// Substring filter on tour type
    pub tour_type: Option<String>,
    /// Archived at or after (RFC 3339)
    pub from: Option<DateTime<Utc>>,
    /// Archived at or before (RFC 3339)
    pub to: Option<DateTime<Utc>>,
}
