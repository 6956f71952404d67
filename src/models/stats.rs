//! Completed-tour statistics

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Statistics for one tour type
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourStats {
    /// Earliest tour date in the group
    pub tour_date: DateTime<Utc>,
    pub tour_type: String,
    /// Guide assigned in the tour-guide directory
    pub guide_name: Option<String>,
    /// Sum of party sizes
    pub total_clients: i64,
    /// Number of checked-in records (not people)
    pub checked_in_count: i64,
    /// `total_clients - checked_in_count`, may be negative
    pub not_arrived_count: i64,
    pub guides: Vec<GuideStats>,
}

/// Per-attributor breakdown inside a tour type
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GuideStats {
    /// Who checked the passengers in ("None" when nobody did)
    pub guide_name: String,
    pub clients: i64,
    pub checked_in_count: i64,
    pub not_arrived_count: i64,
}
