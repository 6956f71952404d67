//! Passenger record model (the active booking set of the current import cycle)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{
    openapi::{schema::Schema, RefOr},
    IntoParams, ToSchema,
};
use validator::Validate;

/// Attributor recorded when the principal has no usable name
pub const UNKNOWN_ATTRIBUTOR: &str = "Unknown";

/// Check-in state of a passenger record.
///
/// The flag and the attributor only ever change together: a record is either
/// not checked in, or checked in by someone.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "CheckInColumns", from = "CheckInColumns")]
pub enum CheckInStatus {
    #[default]
    NotCheckedIn,
    CheckedIn { by: String },
}

impl CheckInStatus {
    /// Checked in by `attributor`, falling back to "Unknown" when blank
    pub fn checked_in_by(attributor: Option<&str>) -> Self {
        let by = attributor
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_ATTRIBUTOR);
        CheckInStatus::CheckedIn { by: by.to_string() }
    }

    pub fn is_checked_in(&self) -> bool {
        matches!(self, CheckInStatus::CheckedIn { .. })
    }

    pub fn attributor(&self) -> Option<&str> {
        match self {
            CheckInStatus::NotCheckedIn => None,
            CheckInStatus::CheckedIn { by } => Some(by.as_str()),
        }
    }

    /// Column values as stored (`checked_in`, `checked_in_by`)
    pub fn columns(&self) -> (bool, Option<&str>) {
        (self.is_checked_in(), self.attributor())
    }
}

/// Flat wire/storage representation of [`CheckInStatus`]
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInColumns {
    pub checked_in: bool,
    pub checked_in_by: Option<String>,
}

impl From<CheckInStatus> for CheckInColumns {
    fn from(status: CheckInStatus) -> Self {
        match status {
            CheckInStatus::NotCheckedIn => CheckInColumns {
                checked_in: false,
                checked_in_by: None,
            },
            CheckInStatus::CheckedIn { by } => CheckInColumns {
                checked_in: true,
                checked_in_by: Some(by),
            },
        }
    }
}

impl From<CheckInColumns> for CheckInStatus {
    fn from(columns: CheckInColumns) -> Self {
        if columns.checked_in {
            CheckInStatus::checked_in_by(columns.checked_in_by.as_deref())
        } else {
            CheckInStatus::NotCheckedIn
        }
    }
}

impl<'s> ToSchema<'s> for CheckInStatus {
    fn schema() -> (&'s str, RefOr<Schema>) {
        ("CheckInStatus", CheckInColumns::schema().1)
    }
}

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct PassengerRecordRow {
    id: i32,
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

impl From<PassengerRecordRow> for PassengerRecord {
    fn from(row: PassengerRecordRow) -> Self {
        PassengerRecord {
            id: row.id,
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

/// Active passenger booking
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PassengerRecord {
    pub id: i32,
    pub tour_date: DateTime<Utc>,
    /// Free-text tour label, soft key into the tour-guide directory
    pub tour_type: String,
    pub seats: Option<String>,
    pub surname: Option<String>,
    pub first_name: Option<String>,
    /// Current party size
    pub pax: i32,
    /// Party size as imported; never updated afterwards
    pub original_pax: i32,
    pub notes: Option<String>,
    pub email_address: Option<String>,
    /// External booking code used by the kiosk check-in
    pub unique_reference: Option<String>,
    pub phone_number: Option<String>,
    #[serde(flatten)]
    pub check_in: CheckInStatus,
}

impl PassengerRecord {
    /// "First Last" for messages, tolerating missing parts
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect();
        if parts.is_empty() {
            "unnamed passenger".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// A record ready to be inserted, produced by the importer or a manual create
#[derive(Debug, Clone, PartialEq)]
pub struct NewPassengerRecord {
    pub tour_date: DateTime<Utc>,
    pub tour_type: String,
    pub seats: Option<String>,
    pub surname: Option<String>,
    pub first_name: Option<String>,
    pub pax: i32,
    pub notes: Option<String>,
    pub email_address: Option<String>,
    pub unique_reference: Option<String>,
    pub phone_number: Option<String>,
}

/// Manual record creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePassengerRecord {
    pub tour_date: DateTime<Utc>,
    #[validate(length(min = 1, message = "Tour type is required"))]
    pub tour_type: String,
    pub seats: Option<String>,
    pub surname: Option<String>,
    pub first_name: Option<String>,
    #[validate(range(min = 0, message = "Pax cannot be negative"))]
    pub pax: i32,
    pub notes: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email_address: Option<String>,
    pub unique_reference: Option<String>,
    pub phone_number: Option<String>,
}

impl From<CreatePassengerRecord> for NewPassengerRecord {
    fn from(data: CreatePassengerRecord) -> Self {
        NewPassengerRecord {
            tour_date: data.tour_date,
            tour_type: data.tour_type.trim().to_string(),
            seats: data.seats,
            surname: data.surname,
            first_name: data.first_name,
            pax: data.pax,
            notes: data.notes,
            email_address: data.email_address,
            unique_reference: data.unique_reference,
            phone_number: data.phone_number,
        }
    }
}

/// Manual record removal request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RemoveRecord {
    pub id: i32,
}

/// Pax correction request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePax {
    #[validate(range(min = 0, message = "Pax cannot be negative"))]
    pub pax: i32,
}

/// Kiosk check-in request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInByReference {
    #[serde(default)]
    pub unique_ref: String,
    /// Tour type of the check-in station; skipped when absent or blank
    pub tour_type: Option<String>,
}

/// Query parameters for listing records
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordQuery {
    /// Substring filter on tour type
    pub tour_type: Option<String>,
}
