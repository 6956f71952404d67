//! Tours: the tour-guide directory and the legacy per-tour passenger lists

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Tour row. For guide lookup only the first row per tour type counts.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: i32,
    pub tour_date: DateTime<Utc>,
    pub tour_type: String,
    pub tour_name: Option<String>,
    pub guide_name: Option<String>,
}

/// Legacy passenger attached to a tour (not touched by spreadsheet imports)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Passenger {
    pub id: i32,
    pub passenger_guid: Uuid,
    pub tour_id: i32,
    pub timestamp: DateTime<Utc>,
    pub surname: Option<String>,
    pub first_name: Option<String>,
    pub pax: i32,
    pub email: Option<String>,
    pub unique_reference: Option<String>,
    pub other_booking_reference: Option<String>,
    pub phone_number: Option<String>,
    pub qr_code_image: Option<String>,
    pub checked_in: bool,
}

/// Tour with its legacy passenger list
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourWithPassengers {
    #[serde(flatten)]
    pub tour: Tour,
    pub passengers: Vec<Passenger>,
}

/// Query for the guide assignment endpoint
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuideAssignmentQuery {
    pub tour_type: Option<String>,
}

/// Guide assignment body
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignGuide {
    /// Guide name; blank or missing clears the assignment
    pub guide_name: Option<String>,
}

/// Party size totals per tour type of the active set
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourPaxSummary {
    pub tour_type: String,
    pub total_pax: i64,
    pub record_count: i64,
    pub guide_name: Option<String>,
}
