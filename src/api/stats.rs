//! Statistics endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::stats::TourStats, AppState};

use super::AuthenticatedUser;

/// Per tour type statistics of tours that have already started
#[utoipa::path(
    get,
    path = "/records/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Statistics sorted by tour date, then tour type", body = Vec<TourStats>)
    )
)]
pub async fn completed_tour_stats(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<TourStats>>> {
    let stats = state.services.stats.completed_tours().await?;
    Ok(Json(stats))
}
