//! Tour endpoints: guide directory, pax summary and legacy passenger lists

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::tour::{AssignGuide, GuideAssignmentQuery, Tour, TourPaxSummary, TourWithPassengers},
    AppState,
};

use super::AuthenticatedUser;

/// Assign a guide to a tour type
#[utoipa::path(
    put,
    path = "/tours/guide",
    tag = "tours",
    security(("bearer_auth" = [])),
    params(GuideAssignmentQuery),
    request_body = AssignGuide,
    responses(
        (status = 200, description = "Directory entry after the change", body = Tour),
        (status = 400, description = "Missing tour type", body = crate::error::ErrorResponse)
    )
)]
pub async fn assign_guide(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<GuideAssignmentQuery>,
    Json(body): Json<AssignGuide>,
) -> AppResult<Json<Tour>> {
    let tour = state
        .services
        .tours
        .assign_guide(query.tour_type.as_deref().unwrap_or_default(), body.guide_name.as_deref())
        .await?;
    Ok(Json(tour))
}

/// Pax totals per tour type of the active set
#[utoipa::path(
    get,
    path = "/tours/allTours",
    tag = "tours",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Totals sorted by tour type", body = Vec<TourPaxSummary>)
    )
)]
pub async fn all_tours(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<TourPaxSummary>>> {
    let summary = state.services.tours.pax_summary().await?;
    Ok(Json(summary))
}

/// Tours with their legacy passenger lists
#[utoipa::path(
    get,
    path = "/tours/Today",
    tag = "tours",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Tours with passengers", body = Vec<TourWithPassengers>)
    )
)]
pub async fn todays_tours(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<TourWithPassengers>>> {
    let tours = state.services.tours.list_with_passengers().await?;
    Ok(Json(tours))
}

/// One tour with its legacy passenger list
#[utoipa::path(
    get,
    path = "/tours/{id}",
    tag = "tours",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Tour ID")),
    responses(
        (status = 200, description = "Tour with passengers", body = TourWithPassengers),
        (status = 404, description = "Tour not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_tour(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<TourWithPassengers>> {
    let tour = state.services.tours.get_with_passengers(id).await?;
    Ok(Json(tour))
}
